//! The extraction schema and its instructions

use serde_json::{json, Value};

/// Name sent with the JSON schema response format
pub const SCHEMA_NAME: &str = "place_data_extraction";

/// System instruction sent with every extraction request
pub const SCHEMA_DESCRIPTION: &str = "\
You extract structured business data from the text of a business website.
The text is made of blocks, one per page, each starting with a line `=== <url> ===`.

Return a single JSON object with exactly these fields and no others:
- name, street, city, state_code, zip: strings, required. state_code is the two-letter US state code.
- latitude, longitude: numbers or null. Use null unless the text states them.
- hours: list of opening hours or null. Give one entry per day of the week the business is open.
  Each entry has day (Monday, Tuesday, Wednesday, Thursday, Friday, Saturday or Sunday),
  open_hour (0-23), open_minute (0-59 or null), close_hour (0-23), close_minute (0-59 or null).
  A business open all day, or whose times are not given, uses open_hour 0 and close_hour 0.
- amenity, price_level, description, phone, email, website, profile_image_url, primary_type: strings or null.
- cuisine, image_urls, secondary_types: lists of strings or null.
- rating: number or null.
- promotion_data: list of recurring offers (happy hours, weekly specials) or null.
  Each has title, description (or null) and hours (list of opening hours entries or null).
- menu_data: list of menu items or null. Each has name, description (or null), price (number) and category.
- event_data: list of one-off, date-bound events or null. Each has title, description (or null),
  start_date, end_date and hours (list of opening hours entries or null).

Only report what the text supports. Use null for anything not found.";

/// Builds the strict JSON schema for a place record
///
/// Every object sets `additionalProperties: false` and lists all of its
/// properties as required; optional values are expressed as nullable types.
pub fn place_json_schema() -> Value {
    let hours = json!({
        "type": "object",
        "properties": {
            "day": {
                "type": "string",
                "enum": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
            },
            "open_hour": { "type": "integer", "minimum": 0, "maximum": 23 },
            "open_minute": { "type": ["integer", "null"], "minimum": 0, "maximum": 59 },
            "close_hour": { "type": "integer", "minimum": 0, "maximum": 23 },
            "close_minute": { "type": ["integer", "null"], "minimum": 0, "maximum": 59 }
        },
        "required": ["day", "open_hour", "open_minute", "close_hour", "close_minute"],
        "additionalProperties": false
    });

    let hours_list = json!({ "type": ["array", "null"], "items": hours });
    let nullable_string = json!({ "type": ["string", "null"] });
    let nullable_number = json!({ "type": ["number", "null"] });
    let nullable_strings = json!({ "type": ["array", "null"], "items": { "type": "string" } });

    let promotion = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": nullable_string,
            "hours": hours_list
        },
        "required": ["title", "description", "hours"],
        "additionalProperties": false
    });

    let menu_item = json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "description": nullable_string,
            "price": { "type": "number" },
            "category": { "type": "string" }
        },
        "required": ["name", "description", "price", "category"],
        "additionalProperties": false
    });

    let event = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": nullable_string,
            "start_date": { "type": "string" },
            "end_date": { "type": "string" },
            "hours": hours_list
        },
        "required": ["title", "description", "start_date", "end_date", "hours"],
        "additionalProperties": false
    });

    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "street": { "type": "string" },
            "city": { "type": "string" },
            "state_code": { "type": "string" },
            "zip": { "type": "string" },
            "latitude": nullable_number,
            "longitude": nullable_number,
            "hours": hours_list,
            "amenity": nullable_string,
            "cuisine": nullable_strings,
            "price_level": nullable_string,
            "rating": nullable_number,
            "description": nullable_string,
            "phone": nullable_string,
            "email": nullable_string,
            "website": nullable_string,
            "profile_image_url": nullable_string,
            "image_urls": nullable_strings,
            "primary_type": nullable_string,
            "secondary_types": nullable_strings,
            "promotion_data": { "type": ["array", "null"], "items": promotion },
            "menu_data": { "type": ["array", "null"], "items": menu_item },
            "event_data": { "type": ["array", "null"], "items": event }
        },
        "required": [
            "name", "street", "city", "state_code", "zip", "latitude", "longitude",
            "hours", "amenity", "cuisine", "price_level", "rating", "description",
            "phone", "email", "website", "profile_image_url", "image_urls",
            "primary_type", "secondary_types", "promotion_data", "menu_data", "event_data"
        ],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walks every object schema in the tree
    fn object_schemas<'a>(value: &'a Value, found: &mut Vec<&'a Value>) {
        match value {
            Value::Object(map) => {
                if map.get("type") == Some(&json!("object")) {
                    found.push(value);
                }
                for child in map.values() {
                    object_schemas(child, found);
                }
            }
            Value::Array(items) => {
                for child in items {
                    object_schemas(child, found);
                }
            }
            _ => {}
        }
    }

    #[test]
    fn test_every_object_is_closed_and_fully_required() {
        let schema = place_json_schema();
        let mut objects = Vec::new();
        object_schemas(&schema, &mut objects);

        // place, hours, promotion, menu item, event
        assert!(objects.len() >= 5);
        for object in objects {
            assert_eq!(object["additionalProperties"], json!(false));

            let properties = object["properties"].as_object().unwrap();
            let required: Vec<&str> = object["required"]
                .as_array()
                .unwrap()
                .iter()
                .map(|v| v.as_str().unwrap())
                .collect();
            assert_eq!(properties.len(), required.len());
            for key in properties.keys() {
                assert!(required.contains(&key.as_str()), "{} not required", key);
            }
        }
    }

    #[test]
    fn test_place_properties_match_record_fields() {
        let schema = place_json_schema();
        let properties = schema["properties"].as_object().unwrap();

        let record = serde_json::to_value(crate::model::PlaceRecord::default()).unwrap();
        let fields = record.as_object().unwrap();

        assert_eq!(properties.len(), fields.len());
        for key in fields.keys() {
            assert!(properties.contains_key(key), "schema lacks {}", key);
        }
    }

    #[test]
    fn test_hour_ranges() {
        let schema = place_json_schema();
        let hours = &schema["properties"]["hours"]["items"];

        assert_eq!(hours["properties"]["open_hour"]["maximum"], json!(23));
        assert_eq!(hours["properties"]["close_minute"]["maximum"], json!(59));
        assert_eq!(hours["properties"]["day"]["enum"].as_array().unwrap().len(), 7);
    }
}
