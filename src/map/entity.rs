use std::collections::HashMap;

/// A classed key/value record parsed from the map's entity block (`classname`, `origin`,
/// `color`, `brightness`, `skytex`, ...).
#[derive(Clone, Debug, Default)]
pub struct Entity {
    pub classname: String,
    pub properties: HashMap<String, String>,
}

impl Entity {
    pub fn new(classname: impl Into<String>) -> Self {
        Self {
            classname: classname.into(),
            properties: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn get_vec3(&self, key: &str) -> Option<glam::Vec3> {
        let raw = self.get(key)?;
        let mut parts = raw.split_whitespace();
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        let z = parts.next()?.parse().ok()?;
        Some(glam::vec3(x, y, z))
    }

    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key)?.parse().ok()
    }
}
