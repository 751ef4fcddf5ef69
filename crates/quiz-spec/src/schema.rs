use serde_json::Value;

use crate::spec::QuizSpec;

/// JSON schema describing quiz documents.
pub fn quiz_schema() -> Value {
    let schema = schemars::schema_for!(QuizSpec);
    schema.to_value()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_quiz_fields() {
        let schema = quiz_schema();
        let props = schema["properties"].as_object().expect("properties");
        assert!(props.contains_key("questions"));
        assert!(props.contains_key("title"));
        let required = schema["required"].as_array().expect("required");
        assert!(required.iter().any(|value| value == "questions"));
    }
}
