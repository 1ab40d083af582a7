use std::collections::BTreeMap;

use crate::Config;

impl Config {
    /// Effective configuration as `key -> (value, source label)`, for display.
    ///
    /// Unset values are reported with their built-in default.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();
        let mut add = |key: &str, value: String| {
            let source = self.source_of(key).label().to_string();
            config.insert(key.to_string(), (value, source));
        };

        add("work_dir", self.work_dir().display().to_string());
        add("timeout_secs", self.timeout().as_secs().to_string());
        add("encoding", self.encoding_label().to_string());
        add("kill_grace_ms", self.kill_grace().as_millis().to_string());
        add("shell", self.shell().program.to_string_lossy().into_owned());
        add("verbose", self.verbose().to_string());
        add("mirror", self.mirror().to_string());

        config
    }
}
