use once_cell::sync::Lazy;
use regex::Regex;

use super::{first_identifier, normalize, ResourceScope, ScopeExtractor};
use crate::domain::tool_cache::ToolArgs;

/// `arn:<partition>:<service>:<region>:<account>:...`
static ARN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^arn:[^:]*:[^:]*:([^:]*):(\d{12}):").expect("aws arn pattern is valid")
});

const ARN_KEYS: &[&str] = &["resource_arn", "resourceArn", "arn"];
const ACCOUNT_KEYS: &[&str] = &["account_id", "accountId", "aws_account_id"];
const REGION_KEYS: &[&str] = &["region", "aws_region"];

/// `aws:<account>[:<region>]`
#[derive(Debug, Default)]
pub struct AwsScopeExtractor;

impl ScopeExtractor for AwsScopeExtractor {
    fn provider(&self) -> &'static str {
        "aws"
    }

    fn namespaces(&self) -> &'static [&'static str] {
        &["aws"]
    }

    fn extract(&self, args: &ToolArgs) -> Option<ResourceScope> {
        if let Some(scope) = self.from_arn(args) {
            return Some(scope);
        }

        let account = first_identifier(args, ACCOUNT_KEYS)?;
        let region = first_identifier(args, REGION_KEYS);

        Some(ResourceScope::new(self.provider(), account).with_secondary(region))
    }
}

impl AwsScopeExtractor {
    fn from_arn(&self, args: &ToolArgs) -> Option<ResourceScope> {
        ARN_KEYS.iter().find_map(|key| {
            let captures = ARN.captures(args.get(*key)?.as_str()?)?;
            let account = normalize(captures.get(2)?.as_str())?;
            // Global services such as IAM leave the region segment empty
            let region = captures.get(1).and_then(|m| normalize(m.as_str()));

            Some(ResourceScope::new(self.provider(), account).with_secondary(region))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(value: serde_json::Value) -> Option<String> {
        let args: ToolArgs = serde_json::from_value(value).unwrap();
        AwsScopeExtractor.extract(&args).map(|s| s.to_string())
    }

    #[test]
    fn test_arn() {
        assert_eq!(
            extract(json!({"resource_arn": "arn:aws:ec2:us-east-1:123456789012:instance/i-0abc"})),
            Some("aws:123456789012:us-east-1".to_string())
        );
    }

    #[test]
    fn test_global_arn_skips_region() {
        assert_eq!(
            extract(json!({"arn": "arn:aws:iam::123456789012:role/admin"})),
            Some("aws:123456789012".to_string())
        );
    }

    #[test]
    fn test_account_fields() {
        assert_eq!(
            extract(json!({"account_id": "123456789012", "region": "EU-West-1"})),
            Some("aws:123456789012:eu-west-1".to_string())
        );
        assert_eq!(
            extract(json!({"accountId": 123456789012u64})),
            Some("aws:123456789012".to_string())
        );
    }

    #[test]
    fn test_region_alone_is_not_a_scope() {
        assert_eq!(extract(json!({"region": "us-east-1"})), None);
    }

    #[test]
    fn test_handles_aws_tools() {
        assert!(AwsScopeExtractor.handles("aws_cost_explorer"));
        assert!(AwsScopeExtractor.handles("awp-aws-list-buckets"));
        assert!(!AwsScopeExtractor.handles("azure_get_costs"));
    }
}
