use glam::{Vec2, Vec3};

/// Shape of a named shader input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniformKind {
    F32,
    Vec2,
    Vec3,
}

impl UniformKind {
    /// Alignment in the uniform address space (WGSL rules).
    pub const fn align(self) -> usize {
        match self {
            UniformKind::F32 => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 16,
        }
    }

    pub const fn size(self) -> usize {
        match self {
            UniformKind::F32 => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
        }
    }
}

impl std::fmt::Display for UniformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UniformKind::F32 => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec3 => "vec3<f32>",
        };
        f.write_str(name)
    }
}

/// A value for a named shader input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::F32(_) => UniformKind::F32,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniformError {
    #[error("shader program has no input named `{0}`")]
    UnknownInput(String),
    #[error("shader input `{name}` is {expected}, got {found}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        found: UniformKind,
    },
}

/// Capability to set named inputs on the active shader program.
///
/// The render loop only talks to the GPU program through this trait.
pub trait ShaderInputs {
    fn set_input(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError>;

    fn set_f32(&mut self, name: &str, value: f32) -> Result<(), UniformError> {
        self.set_input(name, UniformValue::F32(value))
    }

    fn set_vec2(&mut self, name: &str, value: Vec2) -> Result<(), UniformError> {
        self.set_input(name, UniformValue::Vec2(value))
    }

    fn set_vec3(&mut self, name: &str, value: Vec3) -> Result<(), UniformError> {
        self.set_input(name, UniformValue::Vec3(value))
    }
}

/// One named member of a uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformField {
    pub name: &'static str,
    pub kind: UniformKind,
    pub offset: usize,
}

/// Byte layout of a uniform struct, members in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: usize,
}

impl UniformLayout {
    /// Lays out `members` the way WGSL lays out a uniform struct.
    pub fn new(members: &[(&'static str, UniformKind)]) -> Self {
        let mut offset: usize = 0;
        let mut fields = Vec::with_capacity(members.len());
        for &(name, kind) in members {
            offset = offset.next_multiple_of(kind.align());
            fields.push(UniformField { name, kind, offset });
            offset += kind.size();
        }
        // Buffer size is padded to a multiple of 16 bytes, never below the
        // WGSL struct size.
        let size = offset.next_multiple_of(16).max(16);
        Self { fields, size }
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Struct size in bytes, padding included.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// CPU-side staging copy of a uniform block.
///
/// Every member is made of f32 lanes at 4-byte aligned offsets, so the
/// block is stored as words and viewed as bytes for upload.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    words: Vec<f32>,
}

impl UniformBlock {
    pub fn new(layout: UniformLayout) -> Self {
        let words = vec![0.0; layout.size() / 4];
        Self { layout, words }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    fn lanes(field: &UniformField) -> std::ops::Range<usize> {
        let start = field.offset / 4;
        start..start + field.kind.size() / 4
    }

    /// Reads back a value, mainly for diagnostics and tests.
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        let field = self.layout.field(name)?;
        let floats = &self.words[Self::lanes(field)];
        Some(match field.kind {
            UniformKind::F32 => UniformValue::F32(floats[0]),
            UniformKind::Vec2 => UniformValue::Vec2(Vec2::from_slice(floats)),
            UniformKind::Vec3 => UniformValue::Vec3(Vec3::from_slice(floats)),
        })
    }
}

impl ShaderInputs for UniformBlock {
    fn set_input(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let field = *self
            .layout
            .field(name)
            .ok_or_else(|| UniformError::UnknownInput(name.to_string()))?;
        if field.kind != value.kind() {
            return Err(UniformError::KindMismatch {
                name: name.to_string(),
                expected: field.kind,
                found: value.kind(),
            });
        }

        let dst = &mut self.words[Self::lanes(&field)];
        match value {
            UniformValue::F32(v) => dst[0] = v,
            UniformValue::Vec2(v) => dst.copy_from_slice(&v.to_array()),
            UniformValue::Vec3(v) => dst.copy_from_slice(&v.to_array()),
        }
        Ok(())
    }
}
