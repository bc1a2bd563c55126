//! Classifier trait

use harmwatch_core::ClassificationVerdict;

/// Trait for all harm classifiers.
///
/// Implementations must be total: any string input, including the empty
/// string, produces a verdict. There is no error path.
pub trait Classifier: Send + Sync {
    /// Classify `text`, using `domains` (URL hosts referenced by the event)
    /// as an additional signal. An empty slice means no domains.
    fn classify(&self, text: &str, domains: &[String]) -> ClassificationVerdict;

    /// Get the classifier name
    fn name(&self) -> &str;
}

