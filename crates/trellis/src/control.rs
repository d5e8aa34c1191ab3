//! Control nodes and their kind payloads

use std::any::Any;
use std::fmt;

use glam::Vec2;
use slotmap::new_key_type;
use trellis_macros::{LoadProperties, WithBuilders};

use crate::check_box::CheckBox;
use crate::color::Color;
use crate::events::Callbacks;
use crate::geometry::{Align, AnchorType, DimType, Placement, PosType, Rect};
use crate::property::{
    enum_property, property_enum, FromProperty, LoadProperties, Property, PropertySet,
    EMPTY_PROPERTY,
};
use crate::style::StyleRef;
use crate::text_box::TextBox;
use crate::tree_view::TreeView;

new_key_type! {
    /// Handle to a control stored in a [`ControlTree`](crate::ControlTree)
    pub struct ControlId;
}

/// Closed set of control kinds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlKind {
    #[default]
    Control,
    Button,
    Panel,
    Label,
    Image,
    CheckBox,
    TreeView,
    TextBox,
}

property_enum!(ControlKind, "control kind", {
    "control" => ControlKind::Control,
    "button" => ControlKind::Button,
    "panel" => ControlKind::Panel,
    "label" => ControlKind::Label,
    "image" => ControlKind::Image,
    "checkBox" => ControlKind::CheckBox,
    "treeView" => ControlKind::TreeView,
    "textBox" => ControlKind::TextBox,
});

/// Interaction state derived each frame from the context's pointers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ControlState {
    #[default]
    Normal,
    Disabled,
    Hover,
    Down,
}

#[derive(Clone, Debug, Default, PartialEq, WithBuilders, LoadProperties)]
pub struct Button {
    #[property("caption")]
    pub caption: String,
}

#[derive(Clone, Debug, Default, PartialEq, WithBuilders, LoadProperties)]
pub struct Panel {
    #[property("color")]
    pub color: Color,
}

#[derive(Clone, Debug, Default, PartialEq, WithBuilders, LoadProperties)]
pub struct Label {
    #[property("text")]
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, WithBuilders, LoadProperties)]
pub struct Image {
    /// Name of the image resource, resolved by the renderer
    #[property("image")]
    pub image: String,
}

/// Kind-specific payload of a control
#[derive(Clone, Debug, Default)]
pub enum Widget {
    #[default]
    Control,
    Button(Button),
    Panel(Panel),
    Label(Label),
    Image(Image),
    CheckBox(CheckBox),
    TreeView(TreeView),
    TextBox(TextBox),
}

impl Widget {
    pub fn new(kind: ControlKind) -> Self {
        match kind {
            ControlKind::Control => Widget::Control,
            ControlKind::Button => Widget::Button(Button::default()),
            ControlKind::Panel => Widget::Panel(Panel::default()),
            ControlKind::Label => Widget::Label(Label::default()),
            ControlKind::Image => Widget::Image(Image::default()),
            ControlKind::CheckBox => Widget::CheckBox(CheckBox::default()),
            ControlKind::TreeView => Widget::TreeView(TreeView::default()),
            ControlKind::TextBox => Widget::TextBox(TextBox::default()),
        }
    }

    pub fn kind(&self) -> ControlKind {
        match self {
            Widget::Control => ControlKind::Control,
            Widget::Button(_) => ControlKind::Button,
            Widget::Panel(_) => ControlKind::Panel,
            Widget::Label(_) => ControlKind::Label,
            Widget::Image(_) => ControlKind::Image,
            Widget::CheckBox(_) => ControlKind::CheckBox,
            Widget::TreeView(_) => ControlKind::TreeView,
            Widget::TextBox(_) => ControlKind::TextBox,
        }
    }
}

impl LoadProperties for Widget {
    fn load_properties(&mut self, properties: &PropertySet) {
        match self {
            Widget::Control => {}
            Widget::Button(button) => button.load_properties(properties),
            Widget::Panel(panel) => panel.load_properties(properties),
            Widget::Label(label) => label.load_properties(properties),
            Widget::Image(image) => image.load_properties(properties),
            Widget::CheckBox(check_box) => check_box.load_properties(properties),
            Widget::TreeView(tree_view) => tree_view.load_properties(properties),
            Widget::TextBox(text_box) => text_box.load_properties(properties),
        }
    }
}

/// A node of the control tree
#[derive(WithBuilders)]
pub struct Control {
    /// Lookup key for [`ControlTree::find`](crate::ControlTree::find)
    pub name: String,
    pub style: StyleRef,
    pub placement: Placement,
    pub visible: bool,
    pub enabled: bool,
    /// Skipped as a hit-test target; children stay hittable
    pub click_through: bool,
    pub widget: Widget,
    #[with_builders(skip)]
    pub(crate) parent: Option<ControlId>,
    #[with_builders(skip)]
    pub(crate) children: Vec<ControlId>,
    #[with_builders(skip)]
    pub(crate) retain_count: u32,
    #[with_builders(skip)]
    pub(crate) properties: PropertySet,
    #[with_builders(skip)]
    user_data: Option<Box<dyn Any>>,
    #[with_builders(skip)]
    pub(crate) callbacks: Callbacks,
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("style", &self.style.name)
            .field("placement", &self.placement)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("retain_count", &self.retain_count)
            .finish_non_exhaustive()
    }
}

impl Default for Control {
    fn default() -> Self {
        Self::new(ControlKind::Control)
    }
}

impl Control {
    pub fn new(kind: ControlKind) -> Self {
        Self {
            name: String::new(),
            style: StyleRef::default(),
            placement: Placement::default(),
            visible: true,
            enabled: true,
            click_through: false,
            widget: Widget::new(kind),
            parent: None,
            children: Vec::new(),
            retain_count: 0,
            properties: PropertySet::new(),
            user_data: None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn kind(&self) -> ControlKind {
        self.widget.kind()
    }

    /// Enabled and visible
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.visible
    }

    pub fn parent(&self) -> Option<ControlId> {
        self.parent
    }

    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    pub fn retain_count(&self) -> u32 {
        self.retain_count
    }

    pub fn set_style(&mut self, name: &str) {
        self.style = StyleRef::new(name);
    }

    pub fn with_style_name(mut self, name: &str) -> Self {
        self.set_style(name);
        self
    }

    pub fn rect(&self) -> Rect {
        self.placement.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.placement.rect = rect;
    }

    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.placement.anchor = anchor;
    }

    pub fn set_align(&mut self, align: Align) {
        self.placement.align = align;
    }

    pub fn set_dim_types(&mut self, width: DimType, height: DimType) {
        self.placement.dim_type = [width, height];
    }

    pub fn set_pos_types(&mut self, x: PosType, y: PosType) {
        self.placement.pos_type = [x, y];
    }

    pub fn set_anchor_types(&mut self, x: AnchorType, y: AnchorType) {
        self.placement.anchor_type = [x, y];
    }

    /// Raw declarative property, or an empty string property when absent
    pub fn property(&self, name: &str) -> &Property {
        self.properties.get(name).unwrap_or(&EMPTY_PROPERTY)
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn set_property(&mut self, name: &str, value: impl Into<Property>) {
        self.properties.insert(name.to_string(), value.into());
    }

    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_ref()?.downcast_ref()
    }

    pub fn user_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.user_data.as_mut()?.downcast_mut()
    }

    pub fn set_user_data<T: Any>(&mut self, data: T) {
        self.user_data = Some(Box::new(data));
    }

    pub fn take_user_data(&mut self) -> Option<Box<dyn Any>> {
        self.user_data.take()
    }

    /// Copy of this control without tree links, callbacks or user data
    pub fn duplicate(&self) -> Control {
        Control {
            name: self.name.clone(),
            style: self.style.clone(),
            placement: self.placement,
            visible: self.visible,
            enabled: self.enabled,
            click_through: self.click_through,
            widget: self.widget.clone(),
            properties: self.properties.clone(),
            ..Control::default()
        }
    }
}

impl LoadProperties for Control {
    fn load_properties(&mut self, properties: &PropertySet) {
        for (key, value) in properties {
            match key.as_str() {
                "name" => self.name = String::from_property(value),
                "style" => self.set_style(value.as_str()),
                "x" => self.placement.rect.position.x = value.as_float(),
                "y" => self.placement.rect.position.y = value.as_float(),
                "width" => self.placement.rect.size.x = value.as_float(),
                "height" => self.placement.rect.size.y = value.as_float(),
                "xType" => self.placement.pos_type[0] = enum_property(value),
                "yType" => self.placement.pos_type[1] = enum_property(value),
                "widthType" => self.placement.dim_type[0] = enum_property(value),
                "heightType" => self.placement.dim_type[1] = enum_property(value),
                "anchorX" => self.placement.anchor.x = value.as_float(),
                "anchorY" => self.placement.anchor.y = value.as_float(),
                "xAnchorType" => self.placement.anchor_type[0] = enum_property(value),
                "yAnchorType" => self.placement.anchor_type[1] = enum_property(value),
                "align" => self.placement.align = enum_property(value),
                "visible" => self.visible = value.as_bool(),
                "enabled" => self.enabled = value.as_bool(),
                "clickThrough" => self.click_through = value.as_bool(),
                _ => {}
            }
        }
        self.widget.load_properties(properties);
        self.properties.extend(
            properties
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }
}

macro_rules! widget_accessors {
    ($($variant:ident: $ty:ty => $get:ident, $get_mut:ident;)*) => {
        impl Control {
            $(
                pub fn $get(&self) -> Option<&$ty> {
                    match &self.widget {
                        Widget::$variant(widget) => Some(widget),
                        _ => None,
                    }
                }

                pub fn $get_mut(&mut self) -> Option<&mut $ty> {
                    match &mut self.widget {
                        Widget::$variant(widget) => Some(widget),
                        _ => None,
                    }
                }
            )*
        }
    };
}

widget_accessors! {
    Button: Button => button, button_mut;
    Panel: Panel => panel, panel_mut;
    Label: Label => label, label_mut;
    Image: Image => image, image_mut;
    CheckBox: CheckBox => check_box, check_box_mut;
    TreeView: TreeView => tree_view, tree_view_mut;
    TextBox: TextBox => text_box, text_box_mut;
}
