//! Plugin metadata reported to the host at start.

/// Name, signature and description copied into the host's buffers by
/// `XPluginStart`. The signature should be globally unique, in reverse-DNS
/// style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: String,
    pub signature: String,
    pub description: String,
}
