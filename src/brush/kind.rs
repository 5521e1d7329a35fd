use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selects the rendering algorithm for a brush.
///
/// Built-in kinds have renderers in [`BrushRegistry::with_builtin`](super::renderers::BrushRegistry::with_builtin).
/// `Custom` names a renderer a host registers itself; an unregistered kind is
/// rejected at draw time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BrushKind {
    #[default]
    Brush,
    Soft,
    Eraser,
    Watercolor,
    Calligraphy,
    Ink,
    Spray,
    Pencil,
    Charcoal,
    Crayon,
    Marker,
    Pixel,
    Texture,
    Neon,
    Rainbow,
    Custom(String),
}

impl BrushKind {
    /// Every built-in kind, in UI order
    pub const BUILTIN: [BrushKind; 15] = [
        BrushKind::Brush,
        BrushKind::Soft,
        BrushKind::Eraser,
        BrushKind::Watercolor,
        BrushKind::Calligraphy,
        BrushKind::Ink,
        BrushKind::Spray,
        BrushKind::Pencil,
        BrushKind::Charcoal,
        BrushKind::Crayon,
        BrushKind::Marker,
        BrushKind::Pixel,
        BrushKind::Texture,
        BrushKind::Neon,
        BrushKind::Rainbow,
    ];

    pub fn name(&self) -> &str {
        match self {
            BrushKind::Brush => "brush",
            BrushKind::Soft => "soft",
            BrushKind::Eraser => "eraser",
            BrushKind::Watercolor => "watercolor",
            BrushKind::Calligraphy => "calligraphy",
            BrushKind::Ink => "ink",
            BrushKind::Spray => "spray",
            BrushKind::Pencil => "pencil",
            BrushKind::Charcoal => "charcoal",
            BrushKind::Crayon => "crayon",
            BrushKind::Marker => "marker",
            BrushKind::Pixel => "pixel",
            BrushKind::Texture => "texture",
            BrushKind::Neon => "neon",
            BrushKind::Rainbow => "rainbow",
            BrushKind::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, BrushKind::Custom(_))
    }
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrushKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Ok(BrushKind::BUILTIN
            .iter()
            .find(|kind| kind.name() == name)
            .cloned()
            .unwrap_or(BrushKind::Custom(s.trim().to_string())))
    }
}

impl From<String> for BrushKind {
    fn from(name: String) -> Self {
        match name.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for BrushKind {
    fn from(name: &str) -> Self {
        BrushKind::from(name.to_string())
    }
}

impl From<BrushKind> for String {
    fn from(kind: BrushKind) -> Self {
        kind.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builtin_names() {
        for kind in BrushKind::BUILTIN {
            assert_eq!(BrushKind::from(kind.name()), kind);
        }
        assert_eq!(BrushKind::from(" Watercolor "), BrushKind::Watercolor);
    }

    #[test]
    fn test_unknown_names_become_custom() {
        let kind = BrushKind::from("glitter");
        assert_eq!(kind, BrushKind::Custom("glitter".to_string()));
        assert!(!kind.is_builtin());
        assert_eq!(kind.to_string(), "glitter");
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&BrushKind::Calligraphy).unwrap();
        assert_eq!(json, "\"calligraphy\"");
        let kind: BrushKind = serde_json::from_str("\"spray\"").unwrap();
        assert_eq!(kind, BrushKind::Spray);
    }
}
