use serde::{Deserialize, Serialize};

/// Closed set of model capabilities. Only `Vision` targets accept image
/// attachments; only `Image` targets short-circuit to generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Chat,
    Vision,
    Image,
}

impl ModelKind {
    pub fn accepts_images(&self) -> bool {
        matches!(self, Self::Vision)
    }

    pub fn is_image_generator(&self) -> bool {
        matches!(self, Self::Image)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSpec {
    pub label: String,
    pub id: String,
    pub kind: ModelKind,
}

impl ModelSpec {
    pub fn new(label: impl Into<String>, id: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
            kind,
        }
    }
}

/// The selectable model menu.
pub fn default_catalog() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new("DeepSeek V3", "deepseek-ai/DeepSeek-V3", ModelKind::Chat),
        ModelSpec::new("DeepSeek R1", "deepseek-ai/DeepSeek-R1", ModelKind::Chat),
        ModelSpec::new("Qwen 2.5 VL", "Qwen/Qwen2.5-VL-7B-Instruct", ModelKind::Vision),
        ModelSpec::new("Flux.1 Schnell", "black-forest-labs/FLUX.1-schnell", ModelKind::Image),
        ModelSpec::new("Qwen 2.5 Coder", "Qwen/Qwen2.5-Coder-32B-Instruct", ModelKind::Chat),
        ModelSpec::new("Llama 3.3 70B", "meta-llama/Llama-3.3-70B-Instruct", ModelKind::Chat),
    ]
}

/// Pick a model by 1-based menu index, model id, or label. An
/// unrecognized choice falls back to the first catalog entry; only an
/// empty catalog yields `None`.
pub fn select<'a>(catalog: &'a [ModelSpec], choice: &str) -> Option<&'a ModelSpec> {
    let choice = choice.trim();
    if let Ok(index) = choice.parse::<usize>() {
        if index >= 1 && index <= catalog.len() {
            return Some(&catalog[index - 1]);
        }
    }
    catalog
        .iter()
        .find(|m| m.id == choice || m.label.eq_ignore_ascii_case(choice))
        .or_else(|| catalog.first())
}
