//! Runtime configuration directives.
//!
//! Every mutation of [`Settings`] flows through here: `key=value` tokens
//! arriving from the command line, the rc file, or a forwarded wire
//! message. Each token contributes the update-mask bits of the scope it
//! affects; a message's bits are OR-combined by the caller.

use thiserror::Error;

use crate::registry::Registry;
use crate::settings::{
    ColorStyle, CornerStyle, Settings, FILTER_CAPACITY, ORDER_ABOVE, ORDER_BELOW,
};
use crate::update::UpdateMask;

/// Errors from applying a single directive token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("unknown directive `{0}`")]
    Unknown(String),

    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

/// Apply one directive token to the settings.
///
/// Returns the update-mask contribution of the directive. On error the
/// settings are left untouched, so callers can skip a bad token and keep
/// applying the rest of a message.
pub fn parse_directive(
    settings: &mut Settings,
    token: &str,
) -> Result<UpdateMask, DirectiveError> {
    let (key, value) = token
        .split_once('=')
        .ok_or_else(|| DirectiveError::Unknown(token.to_string()))?;

    let invalid = || DirectiveError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    match key {
        "active_color" => {
            settings.active_style = parse_color(value).ok_or_else(invalid)?;
            Ok(UpdateMask::ACTIVE)
        }
        "inactive_color" => {
            settings.inactive_style = parse_color(value).ok_or_else(invalid)?;
            Ok(UpdateMask::INACTIVE)
        }
        "border_width" => {
            let width: f32 = value.parse().map_err(|_| invalid())?;
            if !width.is_finite() || width < 0.0 {
                return Err(invalid());
            }
            settings.border_width = width;
            Ok(UpdateMask::ALL)
        }
        "border_style" => {
            settings.corner_style = match value {
                "round" => CornerStyle::Round,
                "square" => CornerStyle::Square,
                _ => return Err(invalid()),
            };
            // Corner geometry is baked into the border object itself.
            Ok(UpdateMask::RECREATE_ALL)
        }
        "border_order" => {
            settings.border_order = match value {
                "above" => ORDER_ABOVE,
                "below" => ORDER_BELOW,
                _ => return Err(invalid()),
            };
            Ok(UpdateMask::ALL)
        }
        "hidpi" => {
            settings.hidpi = parse_switch(value).ok_or_else(invalid)?;
            Ok(UpdateMask::RECREATE_ALL)
        }
        "blacklist" => {
            let (list, enabled) = parse_filter_list(value);
            settings.blacklist = list;
            settings.blacklist_enabled = enabled;
            // Membership changes alter the tracked set itself.
            Ok(UpdateMask::RECREATE_ALL)
        }
        "whitelist" => {
            let (list, enabled) = parse_filter_list(value);
            settings.whitelist = list;
            settings.whitelist_enabled = enabled;
            Ok(UpdateMask::RECREATE_ALL)
        }
        _ => Err(DirectiveError::Unknown(key.to_string())),
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

/// Color grammar: `0xAARRGGBB`, or `gradient(0x…,0x…)` for a two-stop fill.
fn parse_color(value: &str) -> Option<ColorStyle> {
    if let Some(inner) = value
        .strip_prefix("gradient(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let (from, to) = inner.split_once(',')?;
        return Some(ColorStyle::Gradient {
            from: parse_argb(from.trim())?,
            to: parse_argb(to.trim())?,
        });
    }
    parse_argb(value).map(ColorStyle::Solid)
}

fn parse_argb(value: &str) -> Option<u32> {
    let hex = value.strip_prefix("0x")?;
    if hex.is_empty() || hex.len() > 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// An empty value clears the list and disables the mode; a comma-separated
/// list replaces it wholesale and enables the mode.
fn parse_filter_list(value: &str) -> (Registry<String, ()>, bool) {
    let mut list = Registry::with_capacity(FILTER_CAPACITY);
    for name in value.split(',') {
        let name = name.trim();
        if !name.is_empty() {
            list.insert(name.to_string(), ());
        }
    }
    let enabled = !list.is_empty();
    (list, enabled)
}
