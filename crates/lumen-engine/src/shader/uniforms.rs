use std::fmt;

use super::error::ShaderError;

/// Scalar/vector types a uniform field may have.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl UniformKind {
    /// Byte size in the uniform address space.
    pub const fn size(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
        }
    }

    /// Byte alignment in the uniform address space.
    pub const fn align(self) -> usize {
        match self {
            UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 | UniformKind::Vec4 => 16,
        }
    }

    const fn components(self) -> usize {
        self.size() / 4
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniformKind::Float => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec3 => "vec3<f32>",
            UniformKind::Vec4 => "vec4<f32>",
        })
    }
}

/// One named field of a uniform struct.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformField {
    pub name: String,
    pub kind: UniformKind,
    pub offset: usize,
}

/// Field offsets of a WGSL uniform struct, in declaration order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UniformLayout {
    fields: Vec<UniformField>,
    size: usize,
}

impl UniformLayout {
    pub fn builder() -> UniformLayoutBuilder {
        UniformLayoutBuilder::default()
    }

    pub fn fields(&self) -> &[UniformField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&UniformField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Buffer size in bytes, never less than 16.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Builds a [`UniformLayout`]; fields are laid out in call order.
#[derive(Debug, Default)]
pub struct UniformLayoutBuilder {
    fields: Vec<(String, UniformKind)>,
}

impl UniformLayoutBuilder {
    pub fn field(mut self, name: impl Into<String>, kind: UniformKind) -> Self {
        self.fields.push((name.into(), kind));
        self
    }

    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, UniformKind::Float)
    }

    pub fn vec2(self, name: impl Into<String>) -> Self {
        self.field(name, UniformKind::Vec2)
    }

    pub fn vec3(self, name: impl Into<String>) -> Self {
        self.field(name, UniformKind::Vec3)
    }

    pub fn vec4(self, name: impl Into<String>) -> Self {
        self.field(name, UniformKind::Vec4)
    }

    pub fn build(self) -> Result<UniformLayout, ShaderError> {
        let mut fields: Vec<UniformField> = Vec::with_capacity(self.fields.len());
        let mut cursor = 0usize;

        for (name, kind) in self.fields {
            if fields.iter().any(|f| f.name == name) {
                return Err(ShaderError::DuplicateUniform(name));
            }
            let offset = round_up(cursor, kind.align());
            cursor = offset + kind.size();
            fields.push(UniformField { name, kind, offset });
        }

        // Uniform-address-space structs are 16-byte aligned.
        let size = round_up(cursor.max(1), 16);

        Ok(UniformLayout { fields, size })
    }
}

fn round_up(value: usize, align: usize) -> usize {
    value.div_ceil(align) * align
}

/// CPU copy of a uniform buffer.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    /// Zero-initialized storage; starts dirty so the first upload happens.
    pub fn new(layout: UniformLayout) -> Self {
        let bytes = vec![0u8; layout.size()];
        Self {
            layout,
            bytes,
            dirty: true,
        }
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the bytes if they changed since the last call.
    pub fn take_changed(&mut self) -> Option<&[u8]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(&self.bytes)
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> Result<(), ShaderError> {
        self.write(name, UniformKind::Float, &[value])
    }

    pub fn set_vec2(&mut self, name: &str, value: [f32; 2]) -> Result<(), ShaderError> {
        self.write(name, UniformKind::Vec2, &value)
    }

    pub fn set_vec3(&mut self, name: &str, value: [f32; 3]) -> Result<(), ShaderError> {
        self.write(name, UniformKind::Vec3, &value)
    }

    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) -> Result<(), ShaderError> {
        self.write(name, UniformKind::Vec4, &value)
    }

    /// Reads a field back as floats.
    pub fn get(&self, name: &str) -> Option<Vec<f32>> {
        let field = self.layout.field(name)?;
        let end = field.offset + field.kind.size();
        // Storage is a byte vec, so reads must not assume f32 alignment.
        let values = self.bytes[field.offset..end]
            .chunks_exact(4)
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect();
        Some(values)
    }

    fn write(&mut self, name: &str, kind: UniformKind, values: &[f32]) -> Result<(), ShaderError> {
        let field = self
            .layout
            .field(name)
            .ok_or_else(|| ShaderError::UnknownUniform(name.to_string()))?;

        if field.kind != kind {
            return Err(ShaderError::KindMismatch {
                name: name.to_string(),
                expected: field.kind,
                got: kind,
            });
        }
        debug_assert_eq!(values.len(), kind.components());

        let start = field.offset;
        let src: &[u8] = bytemuck::cast_slice(values);
        let dst = &mut self.bytes[start..start + src.len()];
        if dst != src {
            dst.copy_from_slice(src);
            self.dirty = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution_layout() -> UniformLayout {
        UniformLayout::builder()
            .vec2("iResolution")
            .float("frameCount")
            .build()
            .unwrap()
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn vec2_then_float_packs_into_16_bytes() {
        let l = resolution_layout();
        assert_eq!(l.field("iResolution").unwrap().offset, 0);
        assert_eq!(l.field("frameCount").unwrap().offset, 8);
        assert_eq!(l.size(), 16);
    }

    #[test]
    fn float_then_vec2_pads_to_alignment() {
        let l = UniformLayout::builder().float("t").vec2("r").build().unwrap();
        assert_eq!(l.field("r").unwrap().offset, 8);
        assert_eq!(l.size(), 16);
    }

    #[test]
    fn vec3_is_16_aligned_and_shares_tail() {
        let l = UniformLayout::builder()
            .float("a")
            .vec3("b")
            .float("c")
            .build()
            .unwrap();
        assert_eq!(l.field("b").unwrap().offset, 16);
        // A scalar may sit in the fourth lane after a vec3.
        assert_eq!(l.field("c").unwrap().offset, 28);
        assert_eq!(l.size(), 32);
    }

    #[test]
    fn vec4_after_float() {
        let l = UniformLayout::builder().float("a").vec4("b").build().unwrap();
        assert_eq!(l.field("b").unwrap().offset, 16);
        assert_eq!(l.size(), 32);
    }

    #[test]
    fn empty_layout_still_has_a_buffer() {
        let l = UniformLayout::builder().build().unwrap();
        assert!(l.fields().is_empty());
        assert_eq!(l.size(), 16);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = UniformLayout::builder().float("t").vec2("t").build().unwrap_err();
        assert!(matches!(err, ShaderError::DuplicateUniform(n) if n == "t"));
    }

    // ── block ─────────────────────────────────────────────────────────────

    #[test]
    fn set_and_read_back() {
        let mut b = UniformBlock::new(resolution_layout());
        b.set_vec2("iResolution", [1080.0, 720.0]).unwrap();
        b.set_float("frameCount", 42.0).unwrap();

        assert_eq!(b.get("iResolution").unwrap(), vec![1080.0, 720.0]);
        assert_eq!(b.get("frameCount").unwrap(), vec![42.0]);
        assert_eq!(&b.bytes()[8..12], &42.0f32.to_ne_bytes());
    }

    #[test]
    fn unknown_uniform_errors() {
        let mut b = UniformBlock::new(resolution_layout());
        let err = b.set_float("time", 1.0).unwrap_err();
        assert!(matches!(err, ShaderError::UnknownUniform(n) if n == "time"));
    }

    #[test]
    fn kind_mismatch_errors_and_leaves_bytes() {
        let mut b = UniformBlock::new(resolution_layout());
        b.take_changed();
        let err = b.set_float("iResolution", 3.0).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::KindMismatch { expected: UniformKind::Vec2, got: UniformKind::Float, .. }
        ));
        assert!(!b.is_dirty());
        assert!(b.bytes().iter().all(|&x| x == 0));
    }

    #[test]
    fn change_tracking() {
        let mut b = UniformBlock::new(resolution_layout());
        assert!(b.take_changed().is_some());
        assert!(b.take_changed().is_none());

        b.set_float("frameCount", 0.0).unwrap();
        assert!(b.take_changed().is_none(), "writing the same value is not a change");

        b.set_float("frameCount", 1.0).unwrap();
        assert_eq!(b.take_changed().map(<[u8]>::len), Some(16));
    }
}
