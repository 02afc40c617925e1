//! Static fruit catalog
//!
//! Item kinds and the prompts that name them. Built and validated once at
//! startup, then shared read-only by every session.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Index of an item kind within its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KindId(pub usize);

/// Index of a prompt within its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PromptId(pub usize);

/// Plain 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const RED: Rgb = Rgb::new(255, 59, 48);
    pub const ORANGE: Rgb = Rgb::new(255, 149, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 204, 0);
    pub const GREEN: Rgb = Rgb::new(52, 199, 89);
    pub const CYAN: Rgb = Rgb::new(50, 173, 230);
    pub const BLUE: Rgb = Rgb::new(0, 122, 255);
    pub const INDIGO: Rgb = Rgb::new(88, 86, 214);
    pub const PURPLE: Rgb = Rgb::new(175, 82, 222);
    pub const PINK: Rgb = Rgb::new(255, 45, 85);
    pub const BROWN: Rgb = Rgb::new(162, 132, 94);
}

/// A collectible category (one fruit type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemKind {
    /// Model/asset name, unique within the catalog
    pub model: String,
    /// Name shown to the player
    pub display_name: String,
    /// Color of the burst when this kind is grabbed correctly
    pub burst_color: Rgb,
    /// Color used to highlight prompts targeting this kind
    pub prompt_color: Rgb,
}

impl ItemKind {
    pub fn new(model: &str, display_name: &str, prompt_color: Rgb, burst_color: Rgb) -> Self {
        Self {
            model: model.to_string(),
            display_name: display_name.to_string(),
            burst_color,
            prompt_color,
        }
    }
}

/// What the player is shown
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum PromptCue {
    /// A word or phrase ("Apple", "Red", "What squirrels like")
    Text(String),
    /// An image asset name
    Image(String),
}

/// A prompt with its resolved target kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Prompt {
    pub cue: PromptCue,
    pub target: KindId,
}

/// Unresolved prompt as written in catalog data (target by model name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDef {
    pub cue: PromptCue,
    pub target: String,
}

impl PromptDef {
    pub fn text(text: &str, target: &str) -> Self {
        Self {
            cue: PromptCue::Text(text.to_string()),
            target: target.to_string(),
        }
    }

    pub fn image(asset: &str, target: &str) -> Self {
        Self {
            cue: PromptCue::Image(asset.to_string()),
            target: target.to_string(),
        }
    }
}

/// On-disk catalog layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub kinds: Vec<ItemKind>,
    pub prompts: Vec<PromptDef>,
}

/// Validated registry of item kinds and prompts
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CatalogFile")]
pub struct Catalog {
    kinds: Vec<ItemKind>,
    prompts: Vec<Prompt>,
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        Catalog::new(file.kinds, file.prompts)
    }
}

impl Catalog {
    /// Build a catalog, resolving every prompt target against the kinds.
    pub fn new(kinds: Vec<ItemKind>, prompts: Vec<PromptDef>) -> Result<Self, CatalogError> {
        if kinds.is_empty() {
            return Err(CatalogError::NoKinds);
        }
        if prompts.is_empty() {
            return Err(CatalogError::NoPrompts);
        }

        let mut seen = HashSet::new();
        for kind in &kinds {
            if !seen.insert(kind.model.as_str()) {
                return Err(CatalogError::DuplicateKind(kind.model.clone()));
            }
        }

        let mut resolved = Vec::with_capacity(prompts.len());
        for (index, def) in prompts.into_iter().enumerate() {
            let target = kinds
                .iter()
                .position(|k| k.model == def.target)
                .map(KindId)
                .ok_or_else(|| CatalogError::UnknownTarget {
                    index,
                    target: def.target.clone(),
                })?;
            resolved.push(Prompt {
                cue: def.cue,
                target,
            });
        }

        log::debug!(
            "Catalog ready: {} kinds, {} prompts",
            kinds.len(),
            resolved.len()
        );

        Ok(Self {
            kinds,
            prompts: resolved,
        })
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }

    /// The shipped fruit set: seven fruits, 22 one-to-one prompts
    pub fn fruit_grab() -> Result<Self, CatalogError> {
        let kinds = vec![
            ItemKind::new("Apple", "Apple", Rgb::BLUE, Rgb::RED),
            ItemKind::new("Persimmon", "Persimmon", Rgb::GREEN, Rgb::ORANGE),
            ItemKind::new("Grapes", "Grapes", Rgb::PINK, Rgb::PURPLE),
            ItemKind::new("Peach", "Peach", Rgb::CYAN, Rgb::PINK),
            ItemKind::new("Blueberry", "Blueberry", Rgb::YELLOW, Rgb::INDIGO),
            ItemKind::new("Banana", "Banana", Rgb::ORANGE, Rgb::YELLOW),
            ItemKind::new("Acorn", "Acorn", Rgb::PURPLE, Rgb::BROWN),
        ];

        let prompts = vec![
            // Fruit names
            PromptDef::text("Apple", "Apple"),
            PromptDef::text("Grapes", "Grapes"),
            PromptDef::text("Persimmon", "Persimmon"),
            PromptDef::text("Acorn", "Acorn"),
            PromptDef::text("Banana", "Banana"),
            PromptDef::text("Blueberry", "Blueberry"),
            // Colors (each maps to exactly one fruit)
            PromptDef::text("Red", "Apple"),
            PromptDef::text("Purple", "Grapes"),
            PromptDef::text("Blue", "Blueberry"),
            PromptDef::text("Pink", "Peach"),
            PromptDef::text("Orange", "Persimmon"),
            PromptDef::text("Yellow", "Banana"),
            PromptDef::text("Brown", "Acorn"),
            // Concepts
            PromptDef::text("What squirrels like", "Acorn"),
            PromptDef::text("A fruit monkeys like", "Banana"),
            // Pictures (asset name matches model name)
            PromptDef::image("Apple", "Apple"),
            PromptDef::image("Grapes", "Grapes"),
            PromptDef::image("Persimmon", "Persimmon"),
            PromptDef::image("Acorn", "Acorn"),
            PromptDef::image("Banana", "Banana"),
            PromptDef::image("Blueberry", "Blueberry"),
            PromptDef::image("Peach", "Peach"),
        ];

        Self::new(kinds, prompts)
    }

    pub fn kinds(&self) -> &[ItemKind] {
        &self.kinds
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn kind(&self, id: KindId) -> Option<&ItemKind> {
        self.kinds.get(id.0)
    }

    pub fn prompt(&self, id: PromptId) -> Option<&Prompt> {
        self.prompts.get(id.0)
    }

    /// All kind ids in registry order
    pub fn kind_ids(&self) -> impl Iterator<Item = KindId> + '_ {
        (0..self.kinds.len()).map(KindId)
    }

    pub fn kind_by_model(&self, model: &str) -> Option<KindId> {
        self.kinds.iter().position(|k| k.model == model).map(KindId)
    }

    /// Target kind of a prompt
    pub fn target_of(&self, id: PromptId) -> Option<KindId> {
        self.prompt(id).map(|p| p.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fruit_grab_catalog_is_consistent() {
        let catalog = Catalog::fruit_grab().unwrap();
        assert_eq!(catalog.kinds().len(), 7);
        assert_eq!(catalog.prompts().len(), 22);
        for prompt in catalog.prompts() {
            assert!(catalog.kind(prompt.target).is_some());
        }
        // Every kind is reachable from at least one prompt
        for id in catalog.kind_ids() {
            assert!(catalog.prompts().iter().any(|p| p.target == id));
        }
    }

    #[test]
    fn test_color_prompt_resolves_to_fruit() {
        let catalog = Catalog::fruit_grab().unwrap();
        let peach = catalog.kind_by_model("Peach").unwrap();
        let pink = catalog
            .prompts()
            .iter()
            .find(|p| p.cue == PromptCue::Text("Pink".into()))
            .unwrap();
        assert_eq!(pink.target, peach);
    }

    #[test]
    fn test_unknown_target_rejected() {
        let kinds = vec![ItemKind::new("Apple", "Apple", Rgb::BLUE, Rgb::RED)];
        let prompts = vec![
            PromptDef::text("Apple", "Apple"),
            PromptDef::text("Kiwi", "Kiwi"),
        ];
        assert!(matches!(
            Catalog::new(kinds, prompts),
            Err(CatalogError::UnknownTarget { index: 1, target }) if target == "Kiwi"
        ));
    }

    #[test]
    fn test_empty_and_duplicate_rejected() {
        assert!(matches!(
            Catalog::new(Vec::new(), vec![PromptDef::text("a", "a")]),
            Err(CatalogError::NoKinds)
        ));

        let apple = ItemKind::new("Apple", "Apple", Rgb::BLUE, Rgb::RED);
        assert!(matches!(
            Catalog::new(vec![apple.clone()], Vec::new()),
            Err(CatalogError::NoPrompts)
        ));
        assert!(matches!(
            Catalog::new(
                vec![apple.clone(), apple],
                vec![PromptDef::text("Apple", "Apple")]
            ),
            Err(CatalogError::DuplicateKind(model)) if model == "Apple"
        ));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "kinds": [
                {"model": "Apple", "display_name": "Apple",
                 "burst_color": {"r": 255, "g": 0, "b": 0},
                 "prompt_color": {"r": 0, "g": 0, "b": 255}},
                {"model": "Banana", "display_name": "Banana",
                 "burst_color": {"r": 255, "g": 255, "b": 0},
                 "prompt_color": {"r": 255, "g": 128, "b": 0}}
            ],
            "prompts": [
                {"cue": {"type": "text", "value": "Red"}, "target": "Apple"},
                {"cue": {"type": "image", "value": "Banana"}, "target": "Banana"}
            ]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.prompts()[1].target, KindId(1));

        let bad = json.replace("\"target\": \"Banana\"", "\"target\": \"Mango\"");
        assert!(matches!(
            Catalog::from_json(&bad),
            Err(CatalogError::UnknownTarget { index: 1, .. })
        ));
        let err = Catalog::from_json("{\"kinds\": []").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());

        // Deserializing `Catalog` directly runs the same validation
        assert!(serde_json::from_str::<Catalog>(&bad).is_err());
    }
}
