use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Number, Value as JsonValue};

use crate::{error::Result, finder::ContourSet, traits::GeometryBackend};

impl<B: GeometryBackend> ContourSet<'_, B> {
    /// One feature per contour, with its blob summary as properties.
    ///
    /// Contours are polygons; borders around a single pixel or a one pixel
    /// wide line become a `Point` or `LineString`.
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        let mut features = Vec::with_capacity(self.len());

        for (i, contour) in self.contours().iter().enumerate() {
            let geometry = contour_geometry(&contour.points);

            let properties = match serde_json::to_value(self.blob(i)?)? {
                JsonValue::Object(map) => map,
                _ => Map::new(),
            };

            features.push(Feature {
                bbox: None,
                geometry,
                id: Some(geojson::feature::Id::Number(Number::from(i))),
                properties: Some(properties),
                foreign_members: None,
            });
        }

        let mut foreign_members = Map::new();
        foreign_members.insert("image_width".to_string(), JsonValue::from(self.image_width));
        foreign_members.insert("image_height".to_string(), JsonValue::from(self.image_height));
        foreign_members.insert("contour_count".to_string(), JsonValue::from(self.len()));

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    pub fn save_geojson(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}

fn contour_geometry(points: &[[f32; 2]]) -> Option<Geometry> {
    let mut positions: Vec<Vec<f64>> = points
        .iter()
        .map(|&[x, y]| vec![x as f64, y as f64])
        .collect();
    if positions.len() > 1 && positions.first() == positions.last() {
        positions.pop();
    }

    let value = match positions.len() {
        0 => return None,
        1 => Value::Point(positions.swap_remove(0)),
        2 => Value::LineString(positions),
        _ => {
            // GeoJSON rings repeat their first position
            let first = positions[0].clone();
            positions.push(first);
            Value::Polygon(vec![positions])
        }
    };
    Some(Geometry::new(value))
}
