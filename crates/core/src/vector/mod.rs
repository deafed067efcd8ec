//! Vector features: a geometry plus named attributes

use geo_types::{Geometry, LineString, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute key holding a feature's display name
pub const NAME_KEY: &str = "name";

/// Attribute value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(v) => write!(f, "{}", v),
            AttributeValue::Int(v) => write!(f, "{}", v),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::String(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Int(v)
    }
}

/// A geographic feature with geometry and attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<Geometry<f64>>,
    /// Attributes, kept sorted by key
    pub properties: BTreeMap<String, AttributeValue>,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: Some(geometry.into()),
            properties: BTreeMap::new(),
        }
    }

    /// Feature with a `name` attribute
    pub fn named(name: impl Into<String>, geometry: impl Into<Geometry<f64>>) -> Self {
        Self::new(geometry).with_property(NAME_KEY, name.into())
    }

    /// Builder-style attribute setter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn get_property(&self, key: &str) -> Option<&AttributeValue> {
        self.properties.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_property(NAME_KEY).and_then(AttributeValue::as_str)
    }

    /// The geometry if it is a point
    pub fn point(&self) -> Option<Point<f64>> {
        match &self.geometry {
            Some(Geometry::Point(p)) => Some(*p),
            _ => None,
        }
    }

    /// The geometry if it is a line string
    pub fn line_string(&self) -> Option<&LineString<f64>> {
        match &self.geometry {
            Some(Geometry::LineString(l)) => Some(l),
            _ => None,
        }
    }
}

/// Ordered collection of features, the row set of a layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new() -> Self {
        Self { features: Vec::new() }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// First feature whose `name` attribute equals `name`
    pub fn find_by_name(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name() == Some(name))
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, point};

    #[test]
    fn named_features() {
        let nodes: FeatureCollection = [
            Feature::named("A", point!(x: 0.0, y: 0.0)),
            Feature::named("B", point!(x: 1.0, y: 1.0)).with_property("kind", "junction"),
        ]
        .into_iter()
        .collect();

        let b = nodes.find_by_name("B").unwrap();
        assert_eq!(b.point(), Some(point!(x: 1.0, y: 1.0)));
        assert_eq!(b.get_property("kind").and_then(|v| v.as_str()), Some("junction"));
        assert!(nodes.find_by_name("Z").is_none());
    }

    #[test]
    fn geometry_accessors_check_type() {
        let arc = Feature::named("AB", line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]);
        assert!(arc.point().is_none());
        assert_eq!(arc.line_string().map(|l| l.0.len()), Some(2));
        assert_eq!(arc.name(), Some("AB"));
    }
}
