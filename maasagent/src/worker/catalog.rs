//! Handler catalog: the workflows and activities this agent can run.

use crate::worker::Handler;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Catalog construction errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A workflow name was registered twice
    #[error("workflow '{0}' registered twice")]
    DuplicateWorkflow(String),

    /// An activity name was registered twice
    #[error("activity '{0}' registered twice")]
    DuplicateActivity(String),
}

/// Name-indexed handler registry, split by task kind.
///
/// Workflows and activities are separate namespaces; the same name may
/// appear in both. Duplicate registration within a namespace is rejected
/// at construction time. Once the catalog is handed to the pool it is
/// never mutated.
#[derive(Default)]
pub struct HandlerCatalog {
    workflows: HashMap<String, Arc<dyn Handler>>,
    activities: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workflow handler under a name.
    pub fn register_workflow(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if self.workflows.contains_key(&name) {
            return Err(CatalogError::DuplicateWorkflow(name));
        }
        self.workflows.insert(name, handler);
        Ok(())
    }

    /// Register an activity handler under a name.
    pub fn register_activity(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn Handler>,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if self.activities.contains_key(&name) {
            return Err(CatalogError::DuplicateActivity(name));
        }
        self.activities.insert(name, handler);
        Ok(())
    }

    /// Look up a workflow handler by name.
    pub fn workflow(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.workflows.get(name).cloned()
    }

    /// Look up an activity handler by name.
    pub fn activity(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.activities.get(name).cloned()
    }

    /// Registered workflow names, sorted for stable registration requests.
    pub fn workflow_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.workflows.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered activity names, sorted for stable registration requests.
    pub fn activity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.activities.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::{HandlerError, HandlerFuture};
    use maasagent_proto::Payload;

    struct EchoHandler;

    impl Handler for EchoHandler {
        fn call(&self, input: Payload) -> HandlerFuture {
            Box::pin(async move { Ok::<_, HandlerError>(input) })
        }
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = HandlerCatalog::new();

        assert!(catalog.workflow_names().is_empty());
        assert!(catalog.activity_names().is_empty());
        assert!(catalog.workflow("power_on").is_none());
    }

    #[test]
    fn test_register_and_lookup() {
        let mut catalog = HandlerCatalog::new();
        catalog
            .register_workflow("power_on", Arc::new(EchoHandler))
            .unwrap();
        catalog
            .register_activity("power", Arc::new(EchoHandler))
            .unwrap();

        assert!(catalog.workflow("power_on").is_some());
        assert!(catalog.activity("power").is_some());
        // Namespaces are independent
        assert!(catalog.workflow("power").is_none());
        assert!(catalog.activity("power_on").is_none());
    }

    #[test]
    fn test_duplicate_workflow_rejected() {
        let mut catalog = HandlerCatalog::new();
        catalog
            .register_workflow("deploy", Arc::new(EchoHandler))
            .unwrap();

        let err = catalog
            .register_workflow("deploy", Arc::new(EchoHandler))
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateWorkflow(name) if name == "deploy"));
    }

    #[test]
    fn test_duplicate_activity_rejected() {
        let mut catalog = HandlerCatalog::new();
        catalog
            .register_activity("power", Arc::new(EchoHandler))
            .unwrap();

        let err = catalog
            .register_activity("power", Arc::new(EchoHandler))
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateActivity(name) if name == "power"));
    }

    #[test]
    fn test_same_name_across_namespaces_allowed() {
        let mut catalog = HandlerCatalog::new();
        catalog
            .register_workflow("power", Arc::new(EchoHandler))
            .unwrap();
        catalog
            .register_activity("power", Arc::new(EchoHandler))
            .unwrap();

        assert!(catalog.workflow("power").is_some());
        assert!(catalog.activity("power").is_some());
    }

    #[test]
    fn test_names_are_sorted() {
        let mut catalog = HandlerCatalog::new();
        catalog
            .register_workflow("power_on", Arc::new(EchoHandler))
            .unwrap();
        catalog
            .register_workflow("commission", Arc::new(EchoHandler))
            .unwrap();
        catalog
            .register_workflow("deploy", Arc::new(EchoHandler))
            .unwrap();

        assert_eq!(
            catalog.workflow_names(),
            vec!["commission", "deploy", "power_on"]
        );
    }
}
