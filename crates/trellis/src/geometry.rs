//! Geometry resolution for controls
//!
//! A control declares its rectangle per axis under one of several schemes
//! (absolute/relative/percentage sizes, relative/percentage positions, pixel or
//! percentage anchors) plus a 9-way alignment. [`Placement::resolve`] maps that
//! declaration and the parent's world rectangle to the control's own world
//! rectangle. The mapping is pure: it depends on nothing but its two inputs.

use glam::Vec2;
use trellis_macros::WithBuilders;

use crate::property::property_enum;

/// Axis-aligned rectangle defined by its top-left position and size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const ZERO: Self = Self {
        position: Vec2::ZERO,
        size: Vec2::ZERO,
    };

    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    /// Check if a point is inside this rectangle (edges included)
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.position.x
            && point.x <= max.x
            && point.y >= self.position.y
            && point.y <= max.y
    }
}

/// Which point of the control's box is pinned to its resolved position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Align {
    pub const ALL: [Align; 9] = [
        Align::TopLeft,
        Align::Top,
        Align::TopRight,
        Align::Left,
        Align::Center,
        Align::Right,
        Align::BottomLeft,
        Align::Bottom,
        Align::BottomRight,
    ];

    /// Fraction of the control's own size that is subtracted from its position
    pub const fn factor(self) -> Vec2 {
        match self {
            Align::TopLeft => Vec2::new(0.0, 0.0),
            Align::Top => Vec2::new(0.5, 0.0),
            Align::TopRight => Vec2::new(1.0, 0.0),
            Align::Left => Vec2::new(0.0, 0.5),
            Align::Center => Vec2::new(0.5, 0.5),
            Align::Right => Vec2::new(1.0, 0.5),
            Align::BottomLeft => Vec2::new(0.0, 1.0),
            Align::Bottom => Vec2::new(0.5, 1.0),
            Align::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

property_enum!(Align, "alignment", {
    "topLeft" => Align::TopLeft,
    "top" => Align::Top,
    "topRight" => Align::TopRight,
    "left" => Align::Left,
    "center" => Align::Center,
    "right" => Align::Right,
    "bottomLeft" => Align::BottomLeft,
    "bottom" => Align::Bottom,
    "bottomRight" => Align::BottomRight,
});

/// How a declared width or height is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DimType {
    /// Dimension in pixels
    #[default]
    Absolute,
    /// Parent's dimension plus the declared value.
    /// 0 equals the parent, negative shrinks by that many pixels.
    Relative,
    /// Fraction (0-1) of the parent's dimension
    Percentage,
}

property_enum!(DimType, "dimension type", {
    "absolute" => DimType::Absolute,
    "relative" => DimType::Relative,
    "percentage" => DimType::Percentage,
});

/// How a declared x or y is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PosType {
    /// Offset in pixels from the parent's position
    #[default]
    Relative,
    /// Offset as a fraction of the parent's dimension
    Percentage,
}

property_enum!(PosType, "position type", {
    "relative" => PosType::Relative,
    "percentage" => PosType::Percentage,
});

/// How a declared anchor is interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnchorType {
    /// Anchor is in pixels inside the control's own box
    #[default]
    Pixel,
    /// Anchor is a fraction of the control's own resolved size
    Percentage,
}

property_enum!(AnchorType, "anchor type", {
    "pixel" => AnchorType::Pixel,
    "percentage" => AnchorType::Percentage,
});

/// Declared geometry of a control, interpreted per axis
#[derive(Clone, Copy, Debug, Default, PartialEq, WithBuilders)]
pub struct Placement {
    /// Declared position and size, read through the axis types below
    pub rect: Rect,
    /// Pivot inside the control's own box
    pub anchor: Vec2,
    pub align: Align,
    /// Width and height interpretation
    pub dim_type: [DimType; 2],
    /// X and y interpretation
    pub pos_type: [PosType; 2],
    /// Anchor x and y interpretation
    pub anchor_type: [AnchorType; 2],
}

impl Placement {
    /// Placement at a pixel rectangle with every axis in its default mode
    pub fn at(rect: Rect) -> Self {
        Self {
            rect,
            ..Default::default()
        }
    }

    /// Placement that always matches the parent's rectangle
    pub fn fill_parent() -> Self {
        Self {
            dim_type: [DimType::Relative; 2],
            ..Default::default()
        }
    }

    pub fn with_dim_types(mut self, width: DimType, height: DimType) -> Self {
        self.dim_type = [width, height];
        self
    }

    pub fn with_pos_types(mut self, x: PosType, y: PosType) -> Self {
        self.pos_type = [x, y];
        self
    }

    pub fn with_anchor_types(mut self, x: AnchorType, y: AnchorType) -> Self {
        self.anchor_type = [x, y];
        self
    }

    /// Resolved size for the given parent rectangle
    pub fn resolve_size(&self, parent: Rect) -> Vec2 {
        let declared = self.rect.size;
        Vec2::new(
            resolve_dim(self.dim_type[0], declared.x, parent.size.x),
            resolve_dim(self.dim_type[1], declared.y, parent.size.y),
        )
    }

    /// Anchor in pixels for a control of the given resolved size
    pub fn anchor_in_pixels(&self, size: Vec2) -> Vec2 {
        Vec2::new(
            match self.anchor_type[0] {
                AnchorType::Pixel => self.anchor.x,
                AnchorType::Percentage => self.anchor.x * size.x,
            },
            match self.anchor_type[1] {
                AnchorType::Pixel => self.anchor.y,
                AnchorType::Percentage => self.anchor.y * size.y,
            },
        )
    }

    /// Anchor as a fraction of the given resolved size.
    /// Zero-sized axes report 0.
    pub fn anchor_in_percentage(&self, size: Vec2) -> Vec2 {
        let pixels = self.anchor_in_pixels(size);
        Vec2::new(safe_div(pixels.x, size.x), safe_div(pixels.y, size.y))
    }

    /// World rectangle of the control inside `parent`
    pub fn resolve(&self, parent: Rect) -> Rect {
        let size = self.resolve_size(parent);
        let anchor = self.anchor_in_pixels(size);
        let declared = self.rect.position;
        let raw = Vec2::new(
            parent.position.x + resolve_pos(self.pos_type[0], declared.x, parent.size.x),
            parent.position.y + resolve_pos(self.pos_type[1], declared.y, parent.size.y),
        );

        Rect {
            position: raw - anchor - self.align.factor() * size,
            size,
        }
    }

    /// Rewrite the declared rect so that resolving against `parent` yields `world`.
    ///
    /// Axis types, anchor and alignment are preserved. Percentage axes inside a
    /// zero-sized parent collapse to 0.
    pub fn set_world_rect(&mut self, world: Rect, parent: Rect) {
        let size = world.size;
        self.rect.size = Vec2::new(
            unresolve_dim(self.dim_type[0], size.x, parent.size.x),
            unresolve_dim(self.dim_type[1], size.y, parent.size.y),
        );

        let raw = world.position + self.anchor_in_pixels(size) + self.align.factor() * size;
        let offset = raw - parent.position;
        self.rect.position = Vec2::new(
            unresolve_pos(self.pos_type[0], offset.x, parent.size.x),
            unresolve_pos(self.pos_type[1], offset.y, parent.size.y),
        );
    }
}

fn resolve_dim(dim_type: DimType, declared: f32, parent: f32) -> f32 {
    match dim_type {
        DimType::Absolute => declared,
        DimType::Relative => parent + declared,
        DimType::Percentage => declared * parent,
    }
}

fn unresolve_dim(dim_type: DimType, resolved: f32, parent: f32) -> f32 {
    match dim_type {
        DimType::Absolute => resolved,
        DimType::Relative => resolved - parent,
        DimType::Percentage => safe_div(resolved, parent),
    }
}

fn resolve_pos(pos_type: PosType, declared: f32, parent: f32) -> f32 {
    match pos_type {
        PosType::Relative => declared,
        PosType::Percentage => declared * parent,
    }
}

fn unresolve_pos(pos_type: PosType, offset: f32, parent: f32) -> f32 {
    match pos_type {
        PosType::Relative => offset,
        PosType::Percentage => safe_div(offset, parent),
    }
}

fn safe_div(value: f32, by: f32) -> f32 {
    if by == 0.0 {
        0.0
    } else {
        value / by
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn test_percentage_dimensions() {
        let parent = Rect::from_xywh(0.0, 0.0, 200.0, 200.0);
        let placement = Placement::at(Rect::from_xywh(0.0, 0.0, 0.5, 0.5))
            .with_dim_types(DimType::Percentage, DimType::Percentage);

        let world = placement.resolve(parent);
        assert_eq!(world.size, Vec2::new(100.0, 100.0));

        // Each axis is independent
        let placement = placement.with_dim_types(DimType::Percentage, DimType::Absolute);
        let world = placement.resolve(parent);
        assert_eq!(world.size, Vec2::new(100.0, 0.5));
    }

    #[test]
    fn test_relative_dimensions() {
        let parent = Rect::from_xywh(10.0, 10.0, 300.0, 150.0);
        let placement = Placement::at(Rect::from_xywh(0.0, 0.0, 0.0, -20.0))
            .with_dim_types(DimType::Relative, DimType::Relative);

        let world = placement.resolve(parent);
        assert_eq!(world.size, Vec2::new(300.0, 130.0));
    }

    #[test]
    fn test_relative_position() {
        let parent = Rect::from_xywh(50.0, 50.0, 100.0, 100.0);
        let placement = Placement::at(Rect::from_xywh(-10.0, 0.0, 10.0, 10.0));

        let world = placement.resolve(parent);
        assert_eq!(world.position, Vec2::new(40.0, 50.0));
    }

    #[test]
    fn test_percentage_position() {
        let parent = Rect::from_xywh(100.0, 0.0, 400.0, 200.0);
        let placement = Placement::at(Rect::from_xywh(0.25, 0.5, 10.0, 10.0))
            .with_pos_types(PosType::Percentage, PosType::Percentage);

        let world = placement.resolve(parent);
        assert_eq!(world.position, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn test_center_alignment_subtracts_half_size() {
        let parent = Rect::from_xywh(0.0, 0.0, 200.0, 200.0);
        let placement = Placement::at(Rect::from_xywh(100.0, 100.0, 40.0, 20.0))
            .with_align(Align::Center);

        let world = placement.resolve(parent);
        assert_eq!(world.position, Vec2::new(80.0, 90.0));
        assert_eq!(world.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_anchor_modes() {
        let parent = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        let pixel = Placement::at(Rect::from_xywh(50.0, 50.0, 20.0, 10.0))
            .with_anchor(Vec2::new(5.0, 5.0));
        assert_eq!(pixel.resolve(parent).position, Vec2::new(45.0, 45.0));

        let percent = pixel
            .with_anchor(Vec2::new(0.5, 1.0))
            .with_anchor_types(AnchorType::Percentage, AnchorType::Percentage);
        assert_eq!(percent.resolve(parent).position, Vec2::new(40.0, 40.0));
        assert_eq!(percent.anchor_in_pixels(Vec2::new(20.0, 10.0)), Vec2::new(10.0, 10.0));
        assert_eq!(pixel.anchor_in_percentage(Vec2::new(20.0, 10.0)), Vec2::new(0.25, 0.5));
    }

    #[test]
    fn test_zero_size_parent() {
        let parent = Rect::from_xywh(30.0, 30.0, 0.0, 0.0);
        let placement = Placement::at(Rect::from_xywh(0.5, 0.5, 0.5, 0.5))
            .with_dim_types(DimType::Percentage, DimType::Percentage)
            .with_pos_types(PosType::Percentage, PosType::Percentage);

        let world = placement.resolve(parent);
        assert_eq!(world, Rect::from_xywh(30.0, 30.0, 0.0, 0.0));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let parent = Rect::from_xywh(12.0, 7.0, 320.0, 240.0);
        let placement = Placement::at(Rect::from_xywh(0.1, 4.0, -8.0, 0.3))
            .with_dim_types(DimType::Relative, DimType::Percentage)
            .with_pos_types(PosType::Percentage, PosType::Relative)
            .with_align(Align::BottomRight);

        assert_eq!(placement.resolve(parent), placement.resolve(parent));
    }

    #[test]
    fn test_set_world_rect_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x7e11);
        let dims = [DimType::Absolute, DimType::Relative, DimType::Percentage];
        let poses = [PosType::Relative, PosType::Percentage];
        let anchors = [AnchorType::Pixel, AnchorType::Percentage];

        for align in Align::ALL {
            for anchor_type in anchors {
                for _ in 0..16 {
                    let parent = Rect::from_xywh(
                        rng.random_range(-200.0..200.0),
                        rng.random_range(-200.0..200.0),
                        rng.random_range(50.0..500.0),
                        rng.random_range(50.0..500.0),
                    );
                    let dim = dims[rng.random_range(0..dims.len())];
                    let pos = poses[rng.random_range(0..poses.len())];
                    let declared_size = match dim {
                        DimType::Absolute => rng.random_range(0.0..300.0),
                        DimType::Relative => rng.random_range(-40.0..0.0),
                        DimType::Percentage => rng.random_range(0.0..1.0),
                    };
                    let declared_pos = match pos {
                        PosType::Relative => rng.random_range(-100.0..100.0),
                        PosType::Percentage => rng.random_range(0.0..1.0),
                    };
                    let anchor = match anchor_type {
                        AnchorType::Pixel => rng.random_range(-20.0..20.0),
                        AnchorType::Percentage => rng.random_range(0.0..1.0),
                    };

                    let original = Placement::at(Rect::from_xywh(
                        declared_pos,
                        declared_pos,
                        declared_size,
                        declared_size,
                    ))
                    .with_dim_types(dim, dim)
                    .with_pos_types(pos, pos)
                    .with_anchor_types(anchor_type, anchor_type)
                    .with_anchor(Vec2::splat(anchor))
                    .with_align(align);

                    let world = original.resolve(parent);
                    let mut restored = original.with_rect(Rect::ZERO);
                    restored.set_world_rect(world, parent);

                    assert_close(restored.rect.position.x, original.rect.position.x);
                    assert_close(restored.rect.position.y, original.rect.position.y);
                    assert_close(restored.rect.size.x, original.rect.size.x);
                    assert_close(restored.rect.size.y, original.rect.size.y);
                    assert_eq!(restored.anchor, original.anchor);
                }
            }
        }
    }
}
