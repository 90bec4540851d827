//! Host identification snapshot

/// OS and host identification fields, captured fresh on every read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    pub system: String,
    pub node_name: String,
    pub release: String,
    pub version: String,
    pub machine: String,
    pub processor: String,
}

impl HostProfile {
    /// Label/value pairs in readout order
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("System", &self.system),
            ("Node Name", &self.node_name),
            ("Release", &self.release),
            ("Version", &self.version),
            ("Machine", &self.machine),
            ("Processor", &self.processor),
        ]
    }
}
