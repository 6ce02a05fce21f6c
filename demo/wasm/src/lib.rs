// Copyright 2025 Lars Brubaker
// WASM bindings for dcel-delaunay

use dcel_delaunay::{
    BuildConfig, DelaunayBuilder, FaceId, InsertionOrder, Point, Triangulation, EXTERNAL_FACE,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

fn to_js(err: dcel_delaunay::TriangulationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn points_from_flat(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect()
}

/// A finished triangulation held on the Rust side.
#[wasm_bindgen]
pub struct TriangulationJs {
    inner: Triangulation,
}

#[wasm_bindgen]
impl TriangulationJs {
    /// Triangulate a flat [x0,y0, x1,y1, ...] Float64Array.
    /// order: 0=AsGiven 1=Shuffled(seed) 2=Angular
    #[wasm_bindgen(constructor)]
    pub fn new(coords: &[f64], order: u32, seed: u64) -> Result<TriangulationJs, JsValue> {
        let insertion_order = match order {
            1 => InsertionOrder::Shuffled { seed },
            2 => InsertionOrder::Angular,
            _ => InsertionOrder::AsGiven,
        };
        let mut builder = DelaunayBuilder::with_config(BuildConfig {
            insertion_order,
            ..BuildConfig::default()
        });
        let inner = builder.build(&points_from_flat(coords)).map_err(to_js)?;
        Ok(TriangulationJs { inner })
    }

    pub fn vertex_count(&self) -> u32 {
        self.inner.num_vertices() as u32
    }

    /// Flat stored vertex positions [x0,y0, ...]. Vertex 0 is the highest
    /// input point, so indices differ from the input order.
    pub fn get_vertices(&self) -> Vec<f64> {
        self.inner
            .graph()
            .vertices()
            .iter()
            .flat_map(|v| [v.point.x, v.point.y])
            .collect()
    }

    /// Flat triangle vertex-index triples [i0,i1,i2, ...], counter-clockwise.
    pub fn get_triangles(&self) -> Result<Vec<u32>, JsValue> {
        let tris = self.inner.live_triangles().map_err(to_js)?;
        Ok(tris
            .iter()
            .flat_map(|(_, corners)| corners.map(|v| v.0 as u32))
            .collect())
    }

    /// Hull vertex indices in counter-clockwise order.
    pub fn get_hull(&self) -> Vec<u32> {
        self.inner
            .convex_hull()
            .vertices()
            .iter()
            .map(|v| v.0 as u32)
            .collect()
    }

    /// Face containing (x, y); 0 when outside the hull.
    pub fn find_face(&self, x: f64, y: f64) -> Result<u32, JsValue> {
        let f = self.inner.find_face(&Point::new(x, y)).map_err(to_js)?;
        Ok(f.0 as u32)
    }

    /// Corner indices of a face, or an empty array for the external face.
    pub fn face_corners(&self, face: u32) -> Result<Vec<u32>, JsValue> {
        let face = FaceId(face as usize);
        if face == EXTERNAL_FACE {
            return Ok(Vec::new());
        }
        let corners = self.inner.graph().face_vertices(face).map_err(to_js)?;
        Ok(corners
            .iter()
            .filter_map(|c| c.real())
            .map(|v| v.0 as u32)
            .collect())
    }

    /// Faces crossed by the segment (x0, y0) -> (x1, y1).
    pub fn find_path(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Vec<u32>, JsValue> {
        let path = self
            .inner
            .find_path(&Point::new(x0, y0), &Point::new(x1, y1))
            .map_err(to_js)?;
        Ok(path.iter().map(|f| f.0 as u32).collect())
    }

    /// Index of the stored vertex nearest to (x, y).
    pub fn find_closest_point(&self, x: f64, y: f64) -> Result<u32, JsValue> {
        let (v, _) = self
            .inner
            .find_closest_point(&Point::new(x, y))
            .map_err(to_js)?;
        Ok(v.0 as u32)
    }

    /// The two closest stored vertices, or an empty array with fewer than two.
    pub fn find_two_closest(&self) -> Result<Vec<u32>, JsValue> {
        let pair = self.inner.find_two_closest().map_err(to_js)?;
        Ok(pair
            .map(|(a, b)| vec![a.0 as u32, b.0 as u32])
            .unwrap_or_default())
    }
}

/// Convenience: triangulate once and return the triangle index array.
#[wasm_bindgen]
pub fn triangulate(coords: &[f64]) -> Result<Vec<u32>, JsValue> {
    TriangulationJs::new(coords, 0, 0)?.get_triangles()
}
