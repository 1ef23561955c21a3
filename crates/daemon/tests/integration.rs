//! Integration tests for the brim coordination protocol.
//!
//! These tests verify the protocol and dispatch contracts without a live
//! window system:
//! - Wire-message encoding/decoding
//! - Directive application and update-mask accumulation
//! - Dispatch precedence
//! - Filter policy

use brim_core_state::{parse_directive, ColorStyle, Scope, Settings, UpdateMask};
use brim_ipc::{decode_message, encode_args};

// ============================================================================
// Wire Protocol Tests
// ============================================================================

/// Any argument vector without embedded NULs round-trips exactly.
#[test]
fn test_argument_vectors_roundtrip() {
    let vectors: Vec<Vec<&str>> = vec![
        vec![],
        vec!["border_width=6"],
        vec!["active_color=0xffaa00ff", "inactive_color=0x00000000"],
        vec!["blacklist=Finder,Dock", "border_style=square", "hidpi=on"],
        vec!["spaces and = signs are fine"],
    ];

    for args in vectors {
        let message = encode_args(&args).expect("encode");
        assert_eq!(decode_message(&message), args, "roundtrip failed for {:?}", args);
    }
}

/// The wire format is NUL-delimited tokens with a double-NUL terminator.
#[test]
fn test_wire_format_layout() {
    let message = encode_args(&["border_width=6"]).expect("encode");
    assert_eq!(message, b"border_width=6\0\0");

    let message = encode_args(&["a=1", "b=2"]).expect("encode");
    assert_eq!(message, b"a=1\0b=2\0\0");
}

// ============================================================================
// Scenario: Live Reconfigure
// ============================================================================

/// A forwarded `border_width=6` decodes to one directive that sets the
/// width and requests a style-only restyle of every window.
#[test]
fn test_live_reconfigure_scenario() {
    let message = encode_args(&["border_width=6"]).expect("encode");

    let mut settings = Settings::default();
    let mut mask = UpdateMask::NONE;
    for token in decode_message(&message) {
        mask |= parse_directive(&mut settings, &token).expect("directive");
    }

    assert_eq!(settings.border_width, 6.0);
    assert!(mask.contains(UpdateMask::ALL));
    assert!(!mask.contains(UpdateMask::RECREATE_ALL));
    assert_eq!(mask.highest(), Some(Scope::All));
}

/// Mask bits are OR-combined across every directive of one message.
#[test]
fn test_mask_accumulates_across_message() {
    let message = encode_args(&[
        "active_color=0xffaa00ff",
        "inactive_color=0x80000000",
        "border_style=square",
    ])
    .expect("encode");

    let mut settings = Settings::default();
    let mut mask = UpdateMask::NONE;
    for token in decode_message(&message) {
        mask |= parse_directive(&mut settings, &token).expect("directive");
    }

    assert!(mask.contains(UpdateMask::ACTIVE));
    assert!(mask.contains(UpdateMask::INACTIVE));
    assert!(mask.contains(UpdateMask::RECREATE_ALL));
    // The structural bit decides the single action taken.
    assert_eq!(mask.highest(), Some(Scope::RecreateAll));
    assert_eq!(settings.active_style, ColorStyle::Solid(0xffaa00ff));
}

/// Bad tokens inside a message do not poison the rest of it.
#[test]
fn test_partial_application_of_mixed_message() {
    let message = encode_args(&["nonsense", "border_width=8"]).expect("encode");

    let mut settings = Settings::default();
    let mut mask = UpdateMask::NONE;
    for token in decode_message(&message) {
        if let Ok(bits) = parse_directive(&mut settings, &token) {
            mask |= bits;
        }
    }

    assert_eq!(settings.border_width, 8.0);
    assert_eq!(mask.highest(), Some(Scope::All));
}

// ============================================================================
// Scenario: Duplicate Instance Without Directives
// ============================================================================

/// With no arguments the locally computed mask is empty — the conflict
/// condition that must stop a second server from starting.
#[test]
fn test_empty_invocation_produces_empty_mask() {
    let directives: Vec<String> = Vec::new();
    let mut probe = Settings::default();
    let mut mask = UpdateMask::NONE;
    for token in &directives {
        if let Ok(bits) = parse_directive(&mut probe, token) {
            mask |= bits;
        }
    }
    assert!(mask.is_empty());
}

/// Unparseable arguments alone also leave the mask empty.
#[test]
fn test_invalid_only_invocation_produces_empty_mask() {
    let mut probe = Settings::default();
    let mut mask = UpdateMask::NONE;
    for token in ["gibberish", "border_width=very"] {
        if let Ok(bits) = parse_directive(&mut probe, token) {
            mask |= bits;
        }
    }
    assert!(mask.is_empty());
}

// ============================================================================
// Dispatch Precedence
// ============================================================================

/// For any mask, exactly one scope is selected: the highest-precedence
/// bit present.
#[test]
fn test_dispatch_precedence_total_order() {
    let bits = [
        (UpdateMask::RECREATE_ALL, Scope::RecreateAll),
        (UpdateMask::ALL, Scope::All),
        (UpdateMask::ACTIVE, Scope::Active),
        (UpdateMask::INACTIVE, Scope::Inactive),
    ];

    // Every non-empty subset of bits resolves to its highest member.
    for subset in 1u8..16 {
        let mut mask = UpdateMask::NONE;
        let mut expected = None;
        for (index, (bit, scope)) in bits.iter().enumerate() {
            if subset & (1 << index) != 0 {
                mask |= *bit;
                if expected.is_none() {
                    expected = Some(*scope);
                }
            }
        }
        assert_eq!(mask.highest(), expected, "subset {:#06b}", subset);
    }
}

// ============================================================================
// Filter Policy
// ============================================================================

/// Whitelist mode and blacklist mode are never simultaneously applied.
#[test]
fn test_filter_policy_exclusivity() {
    let mut settings = Settings::default();
    parse_directive(&mut settings, "blacklist=Terminal").unwrap();
    assert!(!settings.should_track("Terminal"));

    // Enabling the whitelist makes blacklist membership irrelevant.
    parse_directive(&mut settings, "whitelist=Terminal").unwrap();
    assert!(settings.should_track("Terminal"));
    assert!(!settings.should_track("Finder"));

    // Disabling both modes tracks everything again.
    parse_directive(&mut settings, "whitelist=").unwrap();
    parse_directive(&mut settings, "blacklist=").unwrap();
    assert!(settings.should_track("Terminal"));
    assert!(settings.should_track("Finder"));
}
