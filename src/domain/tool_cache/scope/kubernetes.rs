use super::{first_identifier, ResourceScope, ScopeExtractor};
use crate::domain::tool_cache::ToolArgs;

const CLUSTER_KEYS: &[&str] = &["cluster", "cluster_name", "clusterName", "context"];
const NAMESPACE_KEYS: &[&str] = &["namespace", "ns"];

/// `kubernetes:<cluster>[:<namespace>]`
#[derive(Debug, Default)]
pub struct KubernetesScopeExtractor;

impl ScopeExtractor for KubernetesScopeExtractor {
    fn provider(&self) -> &'static str {
        "kubernetes"
    }

    fn namespaces(&self) -> &'static [&'static str] {
        &["kubernetes", "k8s", "kubectl"]
    }

    fn extract(&self, args: &ToolArgs) -> Option<ResourceScope> {
        let cluster = first_identifier(args, CLUSTER_KEYS)?;
        let namespace = first_identifier(args, NAMESPACE_KEYS);

        Some(ResourceScope::new(self.provider(), cluster).with_secondary(namespace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(value: serde_json::Value) -> Option<String> {
        let args: ToolArgs = serde_json::from_value(value).unwrap();
        KubernetesScopeExtractor.extract(&args).map(|s| s.to_string())
    }

    #[test]
    fn test_cluster_and_namespace() {
        assert_eq!(
            extract(json!({"cluster": "prod-eu", "namespace": "Payments"})),
            Some("kubernetes:prod-eu:payments".to_string())
        );
        assert_eq!(
            extract(json!({"context": "staging"})),
            Some("kubernetes:staging".to_string())
        );
    }

    #[test]
    fn test_namespace_alone_is_not_a_scope() {
        assert_eq!(extract(json!({"namespace": "default"})), None);
    }

    #[test]
    fn test_handles_kubernetes_tools() {
        assert!(KubernetesScopeExtractor.handles("k8s_list_pods"));
        assert!(KubernetesScopeExtractor.handles("kubectl_get"));
        assert!(KubernetesScopeExtractor.handles("kubernetes-describe-node"));
        assert!(!KubernetesScopeExtractor.handles("azure_get_costs"));
    }
}
