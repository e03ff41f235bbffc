use serde::Serialize;

/// Output for annotate command
#[derive(Debug, Serialize)]
pub struct AnnotateOutput {
    pub records_total: usize,
    pub records_annotated: usize,
    pub records_missing: usize,
    pub layer_count: usize,
    pub rows_exported: usize,
    pub output_path: String,
}

/// Output for layers command
#[derive(Debug, Serialize)]
pub struct LayersOutput {
    pub archive: String,
    pub temporal: String,
    pub spatial: String,
    pub target_scale_m: f64,
    pub layers: Vec<LayerInfo>,
}

#[derive(Debug, Serialize)]
pub struct LayerInfo {
    pub period: String,
    pub band: String,
    pub scale_m: f64,
    pub width: usize,
    pub height: usize,
    pub coverage: f64,
}

/// Output for config show command
#[derive(Debug, Serialize)]
pub struct ConfigShowOutput {
    pub entries: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

/// Output for config init command
#[derive(Debug, Serialize)]
pub struct ConfigInitOutput {
    pub path: String,
    pub created: bool,
}
