use unicode_bidi::{BidiInfo, LTR_LEVEL, Level, RTL_LEVEL};

/// Base direction hint for paragraph analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseDirection {
    /// Detect the direction from the text (first strong char).
    #[default]
    Auto,
    /// Force left-to-right.
    Ltr,
    /// Force right-to-left.
    Rtl,
}

impl BaseDirection {
    pub fn to_level(self) -> Option<Level> {
        match self {
            BaseDirection::Auto => None,
            BaseDirection::Ltr => Some(LTR_LEVEL),
            BaseDirection::Rtl => Some(RTL_LEVEL),
        }
    }
}

impl From<quire_config::Direction> for BaseDirection {
    fn from(direction: quire_config::Direction) -> Self {
        match direction {
            quire_config::Direction::Auto => BaseDirection::Auto,
            quire_config::Direction::Ltr => BaseDirection::Ltr,
            quire_config::Direction::Rtl => BaseDirection::Rtl,
        }
    }
}

/// Whether the first paragraph of `text` resolves to right-to-left.
///
/// Explicit bases short-circuit. `Auto` runs UAX-9 paragraph detection;
/// text without strong characters is left-to-right.
pub fn is_rtl(text: &str, base: BaseDirection) -> bool {
    if let Some(level) = base.to_level() {
        return level.is_rtl();
    }
    if text.is_empty() {
        return false;
    }
    let info = BidiInfo::new(text, None);
    info.paragraphs
        .first()
        .is_some_and(|para| para.level.is_rtl())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bases_win() {
        assert!(is_rtl("hello", BaseDirection::Rtl));
        assert!(!is_rtl("שלום", BaseDirection::Ltr));
    }

    #[test]
    fn auto_detects_first_strong_char() {
        assert!(!is_rtl("hello", BaseDirection::Auto));
        assert!(is_rtl("שלום world", BaseDirection::Auto));
        assert!(!is_rtl("world שלום", BaseDirection::Auto));
        assert!(!is_rtl("", BaseDirection::Auto));
        assert!(!is_rtl("123 ...", BaseDirection::Auto));
    }

    #[test]
    fn converts_from_config() {
        assert_eq!(
            BaseDirection::from(quire_config::Direction::Rtl),
            BaseDirection::Rtl
        );
        assert_eq!(BaseDirection::Rtl.to_level(), Some(RTL_LEVEL));
        assert_eq!(BaseDirection::Auto.to_level(), None);
    }
}
