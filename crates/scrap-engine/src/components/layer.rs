use serde::{Deserialize, Serialize};

/// Coarse draw order, the first field of a command's batch key.
///
/// Layers draw back-to-front: everything on `Background` before anything on
/// `World`, and `UI` last. Within a layer, `z_order` then batch state decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RenderLayer {
    Background = 0,
    #[default]
    World = 1,
    Effects = 2,
    UI = 3,
}

impl RenderLayer {
    /// Back-to-front.
    pub const ALL: [RenderLayer; 4] = [Self::Background, Self::World, Self::Effects, Self::UI];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_world() {
        assert_eq!(RenderLayer::default(), RenderLayer::World);
    }

    #[test]
    fn all_is_sorted_back_to_front() {
        assert!(RenderLayer::ALL.windows(2).all(|w| w[0] < w[1]));
        for layer in RenderLayer::ALL {
            assert_eq!(RenderLayer::from_u8(layer.as_u8()), Some(layer));
        }
        assert!(RenderLayer::from_u8(4).is_none());
    }

    #[test]
    fn parses_from_json() {
        let layer: RenderLayer = serde_json::from_str("\"ui\"").unwrap();
        assert_eq!(layer, RenderLayer::UI);
    }
}
