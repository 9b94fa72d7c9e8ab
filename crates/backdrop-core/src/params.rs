//! Kernel parameter map and its uniform-buffer layout.
//!
//! Kernels declare their parameters once; the renderer derives a WGSL
//! `Params` struct from the declaration and packs the live values into a
//! preallocated byte buffer every frame.

use crate::constants::{PARAM_RESOLUTION, PARAM_TIME};
use fnv::FnvHashMap;
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Fixed-capacity array; the length set at declaration is the capacity.
    Vec2Array(Vec<[f32; 2]>),
    Vec3Array(Vec<[f32; 3]>),
}

impl ParamValue {
    fn kind(&self) -> ParamKind {
        match self {
            Self::Float(_) => ParamKind::Float,
            Self::Int(_) => ParamKind::Int,
            Self::Vec2(_) => ParamKind::Vec2,
            Self::Vec3(_) => ParamKind::Vec3,
            Self::Vec4(_) => ParamKind::Vec4,
            Self::Vec2Array(v) => ParamKind::Vec2Array(v.len().max(1)),
            Self::Vec3Array(v) => ParamKind::Vec3Array(v.len().max(1)),
        }
    }
}

/// Ordered name → value map handed to kernels.
#[derive(Clone, Debug, Default)]
pub struct ParamMap {
    entries: Vec<(String, ParamValue)>,
    index: FnvHashMap<String, usize>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map pre-populated with the parameters every kernel receives.
    pub fn with_builtins() -> Self {
        let mut map = Self::new();
        map.insert(PARAM_TIME, ParamValue::Float(0.0));
        map.insert(PARAM_RESOLUTION, ParamValue::Vec2([1.0, 1.0]));
        map
    }

    /// Insert or replace a parameter. Replacing keeps the original position.
    pub fn insert(&mut self, name: &str, value: ParamValue) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParamValue> {
        let i = *self.index.get(name)?;
        Some(&mut self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Set a float parameter in place. Returns `false` if the name is unknown
    /// or holds a different type.
    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        match self.get_mut(name) {
            Some(ParamValue::Float(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> bool {
        match self.get_mut(name) {
            Some(ParamValue::Int(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_vec2(&mut self, name: &str, value: [f32; 2]) -> bool {
        match self.get_mut(name) {
            Some(ParamValue::Vec2(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_vec3(&mut self, name: &str, value: [f32; 3]) -> bool {
        match self.get_mut(name) {
            Some(ParamValue::Vec3(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) -> bool {
        match self.get_mut(name) {
            Some(ParamValue::Vec4(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    /// Copy `values` into the front of an array parameter without resizing it.
    /// Extra values beyond the declared capacity are dropped.
    pub fn write_vec2_array(&mut self, name: &str, values: &[[f32; 2]]) -> bool {
        match self.get_mut(name) {
            Some(ParamValue::Vec2Array(slots)) => {
                let n = values.len().min(slots.len());
                slots[..n].copy_from_slice(&values[..n]);
                true
            }
            _ => false,
        }
    }

    pub fn write_vec3_array(&mut self, name: &str, values: &[[f32; 3]]) -> bool {
        match self.get_mut(name) {
            Some(ParamValue::Vec3Array(slots)) => {
                let n = values.len().min(slots.len());
                slots[..n].copy_from_slice(&values[..n]);
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Float,
    Int,
    Vec2,
    Vec3,
    Vec4,
    Vec2Array(usize),
    Vec3Array(usize),
}

impl ParamKind {
    // (align, size) in the WGSL uniform address space
    fn align_size(self) -> (usize, usize) {
        match self {
            Self::Float | Self::Int => (4, 4),
            Self::Vec2 => (8, 8),
            Self::Vec3 => (16, 12),
            Self::Vec4 => (16, 16),
            Self::Vec2Array(n) | Self::Vec3Array(n) => (16, 16 * n),
        }
    }

    fn wgsl_type(self) -> String {
        match self {
            Self::Float => "f32".into(),
            Self::Int => "i32".into(),
            Self::Vec2 => "vec2<f32>".into(),
            Self::Vec3 => "vec3<f32>".into(),
            Self::Vec4 => "vec4<f32>".into(),
            // uniform arrays need a 16-byte stride, so every element is a vec4
            Self::Vec2Array(n) | Self::Vec3Array(n) => format!("array<vec4<f32>, {n}>"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformField {
    pub name: String,
    pub kind: ParamKind,
    pub offset: usize,
}

/// Byte layout of a [`ParamMap`] as a WGSL uniform struct.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: usize,
}

#[inline]
fn align_up(v: usize, align: usize) -> usize {
    v.div_ceil(align) * align
}

impl UniformLayout {
    pub fn from_params(params: &ParamMap) -> Self {
        let mut cursor = 0;
        let mut fields = Vec::with_capacity(params.len());
        for (name, value) in params.iter() {
            let kind = value.kind();
            let (align, size) = kind.align_size();
            let offset = align_up(cursor, align);
            cursor = offset + size;
            fields.push(UniformField {
                name: name.to_string(),
                kind,
                offset,
            });
        }
        Self {
            fields,
            size: align_up(cursor.max(16), 16),
        }
    }

    /// Total struct size in bytes, a multiple of 16.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// WGSL declaration of the `Params` struct matching this layout.
    pub fn wgsl_struct(&self) -> String {
        let mut out = String::from("struct Params {\n");
        for f in &self.fields {
            _ = writeln!(out, "    {}: {},", f.name, f.kind.wgsl_type());
        }
        out.push_str("};\n");
        out
    }

    /// Write `params` into `out` following this layout.
    ///
    /// Parameters whose type no longer matches the layout are skipped, as are
    /// array elements past the declared capacity. `out` shorter than
    /// [`size`](Self::size) is left untouched.
    pub fn pack_into(&self, params: &ParamMap, out: &mut [u8]) {
        if out.len() < self.size {
            return;
        }
        for f in &self.fields {
            let Some(value) = params.get(&f.name) else {
                continue;
            };
            if value.kind() != f.kind {
                continue;
            }
            let o = f.offset;
            match value {
                ParamValue::Float(v) => out[o..o + 4].copy_from_slice(bytemuck::bytes_of(v)),
                ParamValue::Int(v) => out[o..o + 4].copy_from_slice(bytemuck::bytes_of(v)),
                ParamValue::Vec2(v) => out[o..o + 8].copy_from_slice(bytemuck::cast_slice(v)),
                ParamValue::Vec3(v) => out[o..o + 12].copy_from_slice(bytemuck::cast_slice(v)),
                ParamValue::Vec4(v) => out[o..o + 16].copy_from_slice(bytemuck::cast_slice(v)),
                ParamValue::Vec2Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        let at = o + i * 16;
                        out[at..at + 8].copy_from_slice(bytemuck::cast_slice(item));
                    }
                }
                ParamValue::Vec3Array(items) => {
                    for (i, item) in items.iter().enumerate() {
                        let at = o + i * 16;
                        out[at..at + 12].copy_from_slice(bytemuck::cast_slice(item));
                    }
                }
            }
        }
    }
}
