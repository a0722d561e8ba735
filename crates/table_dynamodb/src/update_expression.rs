use aws_sdk_dynamodb::types::AttributeValue;
use model::Record;
use std::collections::HashMap;

/// A `SET` update with every attribute name and value bound through placeholders,
/// so field names never collide with DynamoDB reserved words.
#[derive(Debug)]
pub(crate) struct UpdateExpression {
    pub(crate) expression: String,
    pub(crate) names: HashMap<String, String>,
    pub(crate) values: HashMap<String, AttributeValue>,
}

impl UpdateExpression {
    /// Build `SET #key0 = :value0, #key1 = :value1, ...` for each field.
    /// `None` when there is nothing to set.
    pub(crate) fn set_fields(fields: &Record) -> Result<Option<Self>, serde_dynamo::Error> {
        if fields.is_empty() {
            return Ok(None);
        }

        let mut assignments: Vec<String> = Vec::with_capacity(fields.len());
        let mut names: HashMap<String, String> = HashMap::with_capacity(fields.len());
        let mut values: HashMap<String, AttributeValue> = HashMap::with_capacity(fields.len());

        for (index, (field, value)) in fields.fields().enumerate() {
            let name: String = format!("#key{index}");
            let placeholder: String = format!(":value{index}");
            let value: AttributeValue = serde_dynamo::to_attribute_value(value)?;

            assignments.push(format!("{name} = {placeholder}"));
            names.insert(name, field.clone());
            values.insert(placeholder, value);
        }

        Ok(Some(UpdateExpression {
            expression: format!("SET {}", assignments.join(", ")),
            names,
            values,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_placeholder_per_field() {
        let fields = Record::try_from(json!({"name": "Desk", "price": 10})).unwrap();

        let update = UpdateExpression::set_fields(&fields).unwrap().unwrap();

        // Fields iterate in key order
        assert_eq!("SET #key0 = :value0, #key1 = :value1", update.expression);
        assert_eq!(Some(&"name".to_string()), update.names.get("#key0"));
        assert_eq!(Some(&"price".to_string()), update.names.get("#key1"));
        assert_eq!(
            Some(&AttributeValue::S("Desk".to_string())),
            update.values.get(":value0")
        );
        assert_eq!(
            Some(&AttributeValue::N("10".to_string())),
            update.values.get(":value1")
        );
    }

    #[test]
    fn nested_values_become_maps() {
        let fields = Record::try_from(json!({"dimensions": {"width": 2}})).unwrap();

        let update = UpdateExpression::set_fields(&fields).unwrap().unwrap();

        let AttributeValue::M(map) = &update.values[":value0"] else {
            panic!("Expected a map attribute, got {:?}", update.values[":value0"]);
        };
        assert_eq!(Some(&AttributeValue::N("2".to_string())), map.get("width"));
    }

    #[test]
    fn empty_fields_have_no_expression() {
        let update = UpdateExpression::set_fields(&Record::new()).unwrap();

        assert!(update.is_none());
    }
}
