//! Baking style into geometry.
//!
//! The key of a derived path is laid out as `(geometry, path effect, stroke)`.
//! Applying the path effect first yields `(geometry, path effect)` as the
//! inherited key; applying the stroke afterwards copies that prefix and
//! appends the stroke part, so both routes end with the same words.

use super::canonical::{Reduced, reduce_path};
use super::{Repr, Shape};
use crate::geometry::Path;
use crate::key::KeyFlags;
use crate::style::{Apply, Style};
use std::borrow::Cow;

impl Shape {
    /// Produce a shape whose geometry has the path effect, or the path effect
    /// and the stroke, of this shape's style applied.
    ///
    /// `scale` is the device scale the result will be drawn at; it controls
    /// approximation tolerance and is part of the derived key.
    pub fn apply_style(&self, apply: Apply, scale: f64) -> Shape {
        let nothing_to_apply = !self.style.applies()
            || (apply == Apply::PathEffectOnly && !self.style.has_path_effect());
        if nothing_to_apply {
            return self.clone();
        }

        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            log::warn!("invalid style scale {}, using 1.0", scale);
            1.0
        };

        let src = self.path_for_style();
        let mut key_parent: Option<Shape> = None;

        let (path, style) = if let Some(pe) = self.style.path_effect() {
            let mut stroke = *self.style.stroke_rec();
            stroke.set_res_scale(scale);
            let Some(filtered) = pe.filter(src.as_bez_path(), &mut stroke) else {
                log::debug!("path effect failed, style application yields an empty shape");
                return Shape::new();
            };
            debug_assert_eq!(stroke.res_scale(), scale, "path effect changed the res scale");
            let filtered = Path::from(filtered);

            let stroked = match apply {
                Apply::PathEffectAndStroke => stroke.apply_to_path(filtered.as_bez_path()),
                Apply::PathEffectOnly => None,
            };
            match stroked {
                Some(stroked) => {
                    // Stroking the filtered path in a second stage would key off
                    // its reduced form, so key off that form here too.
                    key_parent = match reduce_path(&filtered, false, &stroke) {
                        Reduced::Empty => Some(Shape::new()),
                        Reduced::RRect(rrect) => {
                            Some(Shape::from_rrect(rrect, Style::from_stroke(stroke)))
                        }
                        Reduced::Path => None,
                    };
                    (Path::from(stroked), Style::default())
                }
                None => (filtered, Style::from_stroke(stroke)),
            }
        } else {
            let Some((stroked, init)) = self.style.apply_to_path(src.as_bez_path(), scale) else {
                debug_assert!(false, "style applies but produced no geometry");
                return self.clone();
            };
            (Path::from(stroked), Style::from_init(init))
        };

        let mut shape = Shape {
            repr: Repr::Path {
                path,
                inherited_key: Vec::new(),
            },
            style,
        };
        shape.attempt_to_reduce_from_path();
        shape.set_inherited_key(key_parent.as_ref().unwrap_or(self), apply, scale);
        shape
    }

    /// The geometry to feed into a path effect or stroke.
    fn path_for_style(&self) -> Cow<'_, Path> {
        match &self.repr {
            Repr::Path { path, .. } => Cow::Borrowed(path),
            _ => Cow::Owned(self.as_path()),
        }
    }

    /// Derive this shape's key from `parent`'s key and the part of `parent`'s
    /// style that was applied. Only general paths inherit; reduced shapes key
    /// off their own geometry.
    fn set_inherited_key(&mut self, parent: &Shape, apply: Apply, scale: f64) {
        let Repr::Path {
            path,
            inherited_key,
        } = &mut self.repr
        else {
            return;
        };
        debug_assert!(inherited_key.is_empty());

        let parent_key = parent.inherited_key();
        let parent_count = if parent_key.is_empty() {
            match parent.unstyled_key_size() {
                Some(count) => count,
                None => {
                    log::debug!("parent geometry has no key, derived path is volatile");
                    path.set_volatile(true);
                    return;
                }
            }
        } else {
            parent_key.len()
        };

        let mut flags = KeyFlags::NONE;
        if parent.known_to_be_closed() {
            flags |= KeyFlags::CLOSED;
        }
        let Some(style_count) = parent.style.key_size(apply, flags) else {
            log::debug!("style has no key, derived path is volatile");
            path.set_volatile(true);
            return;
        };

        let mut key = vec![0; parent_count + style_count];
        let (geometry_words, style_words) = key.split_at_mut(parent_count);
        if parent_key.is_empty() {
            if parent.write_unstyled_key(geometry_words).is_err() {
                path.set_volatile(true);
                return;
            }
        } else {
            geometry_words.copy_from_slice(parent_key);
        }
        let written = parent.style.write_key(style_words, apply, scale, flags);
        debug_assert_eq!(written, style_count);
        *inherited_key = key;
    }
}
