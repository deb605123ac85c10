//! Read / write / execute classification of tool calls

use serde::{Deserialize, Serialize};

use super::{tool_name_tokens, ToolArgs};

/// Argument keys carrying an HTTP-like method
const METHOD_ARG_KEYS: &[&str] = &["method", "http_method", "httpMethod", "verb"];

/// Tool name verbs that mean the call runs something
const EXECUTE_VERBS: &[&str] = &[
    "execute", "exec", "run", "invoke", "trigger", "command", "script", "apply",
];

/// Tool name verbs that mean the call mutates something
const WRITE_VERBS: &[&str] = &[
    "create", "update", "delete", "remove", "put", "patch", "post", "set", "reset", "start",
    "stop", "restart", "deploy", "scale", "assign", "modify", "write", "upload", "add",
    "attach", "detach", "enable", "disable", "rotate", "purge", "tag",
];

/// Tool name verbs that look something up
const LOOKUP_VERBS: &[&str] = &[
    "get", "list", "describe", "show", "fetch", "read", "query", "search", "find", "view",
];

/// Permission class of a tool invocation
///
/// Ordered by restrictiveness so the stricter of two signals wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionClass {
    Read,
    Write,
    Execute,
}

impl PermissionClass {
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Execute => "execute",
        }
    }
}

impl std::fmt::Display for PermissionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a tool call from its method argument and tool name verbs
///
/// This is the only gate deciding whether a result may be shared across
/// users, so an unrecognised method string counts as a write.
pub fn classify_permission(tool_name: &str, args: &ToolArgs) -> PermissionClass {
    let from_method = METHOD_ARG_KEYS
        .iter()
        .find_map(|key| args.get(*key).and_then(|v| v.as_str()))
        .map(classify_method)
        .unwrap_or(PermissionClass::Read);

    from_method.max(classify_tool_name(tool_name))
}

fn classify_method(method: &str) -> PermissionClass {
    match method.trim().to_ascii_uppercase().as_str() {
        "GET" | "HEAD" | "OPTIONS" => PermissionClass::Read,
        _ => PermissionClass::Write,
    }
}

/// Match whole tool name tokens against verb lists
///
/// After a lookup verb an inflected form names the object being read
/// ("get_tags", "list_deleted_vaults"), so only the bare verb counts there.
fn classify_tool_name(tool_name: &str) -> PermissionClass {
    let tokens = tool_name_tokens(tool_name);
    let has_verb = |verbs: &[&str]| {
        tokens.iter().enumerate().any(|(i, token)| {
            let after_lookup = tokens[..i]
                .iter()
                .any(|earlier| LOOKUP_VERBS.contains(&earlier.as_str()));
            verbs.iter().any(|verb| {
                token == verb || (!after_lookup && is_inflection_of(token, verb))
            })
        })
    };

    if has_verb(EXECUTE_VERBS) {
        PermissionClass::Execute
    } else if has_verb(WRITE_VERBS) {
        PermissionClass::Write
    } else {
        PermissionClass::Read
    }
}

/// `-s`, `-es`, `-d`, `-ed` and `-ing` forms, with a dropped final `e` or a
/// doubled final consonant
fn is_inflection_of(token: &str, verb: &str) -> bool {
    let Some(last) = verb.chars().last() else {
        return false;
    };
    let stem = verb.strip_suffix('e').unwrap_or(verb);
    let doubled = format!("{verb}{last}");

    let inflected = ["s", "es", "d", "ed"]
        .iter()
        .any(|suffix| token.strip_prefix(verb) == Some(*suffix));
    let continuous = token.strip_prefix(stem) == Some("ing");
    let doubled_form = matches!(token.strip_prefix(doubled.as_str()), Some("ed" | "ing"));

    inflected || continuous || doubled_form
}
