use serde::Serialize;

pub struct Masked;

pub trait MaskPolicy {
    fn mask(secret: &str) -> String;
}

impl MaskPolicy for Masked {
    fn mask(secret: &str) -> String {
        let chars: Vec<char> = secret.chars().collect();
        let len = chars.len();
        if len > 8 {
            "*".repeat(len - 4) + &chars[len - 4..].iter().collect::<String>()
        } else {
            "*".repeat(len)
        }
    }
}

/// Return true if a key name likely holds a credential.
fn is_secret_key(key: &str) -> bool {
    let k = key.to_lowercase();
    k.contains("password")
        || k.contains("token") && k != "token_type"
        || k == "authorization"
        || k.contains("secret")
}

pub fn secure_serializable(v: impl Serialize) -> serde_json::Value {
    match serde_json::to_value(v) {
        Ok(value) => secure_value(&value),
        Err(e) => serde_json::Value::String(format!("<unserializable: {e}>")),
    }
}

pub fn secure_value(v: &serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match v {
        Value::Object(map) => {
            let mut new = serde_json::Map::with_capacity(map.len());
            for (k, val) in map {
                let new_val = match val {
                    Value::String(s) if is_secret_key(k) => Value::String(Masked::mask(s)),
                    Value::Number(n) if is_secret_key(k) => {
                        Value::String(Masked::mask(&n.to_string()))
                    }
                    _ => secure_value(val),
                };
                new.insert(k.clone(), new_val);
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(secure_value).collect()),
        other => other.clone(),
    }
}
