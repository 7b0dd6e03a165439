//! Runtime dependency probe abstract Trait

/// Checks whether everything purging needs at runtime is available
pub trait DependencyProbe: Send + Sync {
    /// `Err` carries a human readable description of what is missing
    fn probe(&self) -> Result<(), String>;
}

/// Default probe: an HTTP client can be built with the compiled-in TLS backend
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpStackProbe;

impl DependencyProbe for HttpStackProbe {
    fn probe(&self) -> Result<(), String> {
        edgepurge_provider::http_stack_available().map_err(|e| e.to_string())
    }
}
