use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dump: DumpConfig,

    #[serde(default)]
    pub channel: ChannelConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DumpConfig {
    /// Stream dumped when `--id` is not given
    #[serde(default)]
    pub stream_id: u64,

    /// Directory for default-named outputs (default: current directory)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Publisher written to the TPUB frame
    #[serde(default = "default_publisher")]
    pub publisher: String,

    /// Prefix outputs with an ID3 tag
    #[serde(default = "default_true")]
    pub id3_tag: bool,
}

fn default_publisher() -> String {
    "IStream".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            stream_id: 0,
            output_dir: None,
            publisher: default_publisher(),
            id3_tag: default_true(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChannelConfig {
    /// Walk the channel directory tree instead of its top level
    #[serde(default)]
    pub recursive: bool,
}
