//! Prompt templates for tenant-facing answers

use std::collections::HashMap;

/// Template for generating prompts
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = extract_variables(&template);
        Self {
            template,
            variables,
        }
    }

    /// Fill in the template with variables.
    ///
    /// Substitution is single-pass: placeholders that appear inside a value
    /// (user questions, knowledge text) are never expanded.
    #[must_use]
    pub fn render(&self, values: &HashMap<&str, &str>) -> String {
        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find("}}") {
                Some(end) => {
                    let name = &after[..end];
                    match values.get(name) {
                        Some(value) => result.push_str(value),
                        None => {
                            result.push_str("{{");
                            result.push_str(name);
                            result.push_str("}}");
                        }
                    }
                    rest = &after[end + 2..];
                }
                None => {
                    result.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        result.push_str(rest);
        result
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

/// Extract variable names from template
fn extract_variables(template: &str) -> Vec<String> {
    let mut variables = Vec::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '{' && chars.peek() == Some(&'{') {
            chars.next(); // skip second '{'
            let mut var_name = String::new();
            while let Some(&ch) = chars.peek() {
                if ch == '}' {
                    chars.next();
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        break;
                    }
                } else {
                    var_name.push(ch);
                    chars.next();
                }
            }
            if !var_name.is_empty() && !variables.contains(&var_name) {
                variables.push(var_name);
            }
        }
    }

    variables
}

/// Standard per-tenant prompt templates
pub struct TenantPrompts;

impl TenantPrompts {
    /// Grounded answer: the model may only use the supplied knowledge
    #[must_use]
    pub fn grounded() -> PromptTemplate {
        PromptTemplate::new(
            "You are {{bot_name}}, the AI assistant for {{brand_name}}. \
Answer using ONLY the knowledge below:\n\n\
Knowledge:\n{{knowledge}}\n\nUser Question: {{question}}\nAnswer:",
        )
    }

    /// System persona for small talk
    #[must_use]
    pub fn greeting_persona() -> PromptTemplate {
        PromptTemplate::new("You are {{bot_name}}, a friendly assistant.")
    }

    /// Reply used when nothing in the knowledge base is close enough
    #[must_use]
    pub fn fallback() -> PromptTemplate {
        PromptTemplate::new(
            "Sorry, I couldn't find that in my knowledge base. Visit: {{support_url}}",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_variables() {
        let template = PromptTemplate::new("Hello {{name}}, you are {{age}} years old.");
        assert_eq!(template.variables(), &["name", "age"]);
    }

    #[test]
    fn test_template_render() {
        let template = PromptTemplate::new("Hello {{name}}!");
        let values = HashMap::from([("name", "Alice")]);
        assert_eq!(template.render(&values), "Hello Alice!");
    }

    #[test]
    fn test_unknown_variables_left_in_place() {
        let template = PromptTemplate::new("{{a}} and {{b}}");
        let values = HashMap::from([("a", "x")]);
        assert_eq!(template.render(&values), "x and {{b}}");
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let template = PromptTemplate::new("K: {{knowledge}} Q: {{question}}");
        let values = HashMap::from([("knowledge", "see {{question}}"), ("question", "why?")]);
        assert_eq!(template.render(&values), "K: see {{question}} Q: why?");
    }

    #[test]
    fn test_grounded_template_variables() {
        assert_eq!(
            TenantPrompts::grounded().variables(),
            &["bot_name", "brand_name", "knowledge", "question"]
        );
    }

    #[test]
    fn test_fallback_renders_url_verbatim() {
        let values = HashMap::from([("support_url", "https://acme.test/help?a=1&b=2")]);
        assert_eq!(
            TenantPrompts::fallback().render(&values),
            "Sorry, I couldn't find that in my knowledge base. Visit: https://acme.test/help?a=1&b=2"
        );
    }
}
