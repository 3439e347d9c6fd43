use glam::{Affine3A, Vec2, Vec3, Vec4};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for point in corners {
            let p = matrix.transform_point3(point);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }
}

/// CPU-side vertex data of one mesh primitive.
///
/// Attribute vectors are either empty or `positions.len()` long. Skinned
/// geometry carries `joints` and `weights`.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,

    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<Vec4>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    #[must_use]
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            joints: Vec::new(),
            weights: Vec::new(),
            indices: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// True when every vertex carries joint indices and weights.
    #[must_use]
    pub fn is_skinned(&self) -> bool {
        !self.positions.is_empty()
            && self.joints.len() == self.positions.len()
            && self.weights.len() == self.positions.len()
    }

    /// Offsets every vertex position in place.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Returns an independent copy (new identity) shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        let mut copy = self.clone();
        copy.uuid = Uuid::new_v4();
        copy.translate(offset);
        copy
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.positions.first()?;
        let (min, max) = self
            .positions
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(BoundingBox { min, max })
    }
}
