//! Unstyled geometry keys.

use super::{Repr, Shape};
use crate::geometry::RRect;
use crate::key::{KeyError, KeyResult, KeyWriter};

/// Key word written for every empty shape.
const EMPTY_KEY_SENTINEL: u32 = 1;

const _: () = assert!(RRect::SIZE_IN_MEMORY % std::mem::size_of::<u32>() == 0);
const RRECT_KEY_WORDS: usize = RRect::SIZE_IN_MEMORY / std::mem::size_of::<u32>();
const _: () = assert!(RRECT_KEY_WORDS == RRect::key_words());

impl Shape {
    /// Number of words in this shape's geometry key, ignoring its style.
    ///
    /// `None` means the shape has no stable key and must not be cached.
    pub fn unstyled_key_size(&self) -> Option<usize> {
        match &self.repr {
            Repr::Empty => Some(1),
            Repr::RRect(_) => Some(RRECT_KEY_WORDS),
            Repr::Path { inherited_key, .. } if !inherited_key.is_empty() => {
                Some(inherited_key.len())
            }
            Repr::Path { path, .. } => {
                if path.is_volatile() {
                    None
                } else {
                    Some(1)
                }
            }
        }
    }

    /// Write the geometry key into `out` and return the number of words
    /// written, which always equals [`Shape::unstyled_key_size`].
    pub fn write_unstyled_key(&self, out: &mut [u32]) -> KeyResult<usize> {
        let size = self.unstyled_key_size().ok_or(KeyError::Uncacheable)?;
        if out.len() < size {
            return Err(KeyError::BufferTooSmall {
                needed: size,
                provided: out.len(),
            });
        }

        let mut writer = KeyWriter::new(&mut out[..size]);
        match &self.repr {
            Repr::Path { inherited_key, .. } if !inherited_key.is_empty() => {
                writer.push_words(inherited_key);
            }
            Repr::Empty => writer.push_u32(EMPTY_KEY_SENTINEL),
            Repr::RRect(rrect) => rrect.write_to_words(&mut writer),
            Repr::Path { path, .. } => {
                debug_assert!(!path.is_volatile());
                writer.push_u32(path.generation_id());
            }
        }
        debug_assert_eq!(writer.written(), size);
        Ok(size)
    }

    /// The geometry key as an owned vector, or `None` if uncacheable.
    pub fn unstyled_key(&self) -> Option<Vec<u32>> {
        let mut key = vec![0; self.unstyled_key_size()?];
        self.write_unstyled_key(&mut key).ok()?;
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Path;
    use kurbo::Rect;

    fn triangle() -> Path {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((5.0, 8.0));
        path.close_path();
        path
    }

    #[test]
    fn test_empty_key() {
        let shape = Shape::new();
        assert_eq!(shape.unstyled_key_size(), Some(1));
        assert_eq!(shape.unstyled_key(), Some(vec![EMPTY_KEY_SENTINEL]));
    }

    #[test]
    fn test_rrect_key_size() {
        let shape = Shape::from(Rect::new(0.0, 0.0, 3.0, 4.0));
        assert_eq!(shape.unstyled_key_size(), Some(RRECT_KEY_WORDS));
    }

    #[test]
    fn test_path_key_is_generation_id() {
        let path = triangle();
        let id = path.generation_id();
        let shape = Shape::from(path);
        assert_eq!(shape.unstyled_key(), Some(vec![id]));
    }

    #[test]
    fn test_same_generation_same_key() {
        let path = triangle();
        let a = Shape::from(path.clone());
        let b = Shape::from(path);
        assert_eq!(a.unstyled_key(), b.unstyled_key());
    }

    #[test]
    fn test_different_generation_different_key() {
        let a = Shape::from(triangle());
        let b = Shape::from(triangle());
        assert_ne!(a.unstyled_key(), b.unstyled_key());
    }

    #[test]
    fn test_equal_rrects_share_keys() {
        let a = Shape::from(Rect::new(0.0, 0.0, 3.0, 4.0));
        let b = Shape::from(Path::rect(Rect::new(0.0, 0.0, 3.0, 4.0)));
        assert_eq!(a.unstyled_key(), b.unstyled_key());
        let c = Shape::from(Rect::new(0.0, 0.0, 3.0, 5.0));
        assert_ne!(a.unstyled_key(), c.unstyled_key());
    }

    #[test]
    fn test_volatile_path_has_no_key() {
        let mut path = triangle();
        path.set_volatile(true);
        let shape = Shape::from(path);
        assert_eq!(shape.unstyled_key_size(), None);
        assert_eq!(shape.unstyled_key(), None);
        let mut buf = [0u32; 4];
        assert_eq!(shape.write_unstyled_key(&mut buf), Err(KeyError::Uncacheable));
    }

    #[test]
    fn test_writes_exactly_key_size() {
        let shapes = [
            Shape::new(),
            Shape::from(Rect::new(0.0, 0.0, 3.0, 4.0)),
            Shape::from(triangle()),
        ];
        for shape in shapes {
            let size = shape.unstyled_key_size().unwrap();
            let mut buf = vec![u32::MAX; size + 2];
            assert_eq!(shape.write_unstyled_key(&mut buf), Ok(size));
            assert_eq!(&buf[size..], &[u32::MAX, u32::MAX]);
        }
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let shape = Shape::from(Rect::new(0.0, 0.0, 3.0, 4.0));
        let mut buf = [0u32; 3];
        assert_eq!(
            shape.write_unstyled_key(&mut buf),
            Err(KeyError::BufferTooSmall {
                needed: RRECT_KEY_WORDS,
                provided: 3
            })
        );
    }
}
