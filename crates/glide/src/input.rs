use std::time::Duration;
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u32),
}

impl PointerButton {
    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(serialize = "ArrowLeft", serialize = "Left", serialize = "KP_Left")]
    ArrowLeft,
    #[strum(serialize = "ArrowRight", serialize = "Right", serialize = "KP_Right")]
    ArrowRight,
    #[strum(serialize = "ArrowUp", serialize = "Up", serialize = "KP_Up")]
    ArrowUp,
    #[strum(serialize = "ArrowDown", serialize = "Down", serialize = "KP_Down")]
    ArrowDown,
    #[strum(serialize = "Enter", serialize = "Return", serialize = "KP_Enter")]
    Enter,
    #[strum(serialize = "Escape", serialize = "Esc")]
    Escape,
    #[strum(disabled)]
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Self::Other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Single-shot delayed callback owned by the host.
pub trait HoldTimer {
    fn arm(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}

pub trait Haptics {
    fn pulse(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&self, _duration: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        let cases = vec![
            ("Left", Key::ArrowLeft),
            ("ArrowLeft", Key::ArrowLeft),
            ("right", Key::ArrowRight),
            ("Up", Key::ArrowUp),
            ("KP_Down", Key::ArrowDown),
            ("Return", Key::Enter),
            ("KP_Enter", Key::Enter),
            ("escape", Key::Escape),
            ("a", Key::Other),
            ("Other", Key::Other),
        ];

        for (name, expected) in cases {
            assert_eq!(Key::from_name(name), expected, "{name}");
        }
    }
}
