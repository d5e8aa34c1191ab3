//! Event dispatch demo
//!
//! Opens a window, builds a small control tree and logs every interaction.
//! Nothing is drawn; run with `RUST_LOG=info` (or `debug`/`trace` for the
//! dispatcher's own logging) and watch the terminal.
//!
//! Controls:
//! - Hover and click the button
//! - Click the three radio boxes along the top
//! - Click the text box, type, press Enter or click elsewhere to commit
//! - Click rows in the tree view, ctrl+click to multi-select
//! - ESC: quit

use std::sync::Arc;

use log::info;
use trellis::{
    Button, CheckBehavior, Control, ControlDefinition, ControlId, ControlKind, ControlTree,
    FrameInput, Placement, Rect, UiContext, Vec2,
};
use trellis_winit::WinitInputExt;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

struct Demo {
    window: Option<Arc<Window>>,
    tree: ControlTree,
    context: UiContext,
    input: FrameInput,
    root: ControlId,
}

impl Demo {
    fn new() -> Self {
        let mut tree = ControlTree::new();
        let mut context = UiContext::new(Vec2::new(800.0, 600.0));
        let root = build_ui(&mut tree);

        for kind in [
            ControlKind::Button,
            ControlKind::CheckBox,
            ControlKind::TextBox,
            ControlKind::TreeView,
        ] {
            context
                .styles_mut()
                .add_style(kind, "", |control: &Control, rect, state| {
                    log::trace!("draw {:?} {:?} at {:?} ({state:?})", control.kind(), control.name, rect);
                });
        }
        context
            .styles_mut()
            .add_caret_solver(ControlKind::TextBox, "", |_, local| (local.x.max(0.0) / 8.0) as usize);
        context.styles_mut().add_item_style("", |item, rect| {
            log::trace!("draw row {:?} at {:?}", item.text, rect);
        });

        Self {
            window: None,
            tree,
            context,
            input: FrameInput::new(),
            root,
        }
    }

    fn frame(&mut self) {
        self.context
            .update_from_input(&mut self.tree, self.root, &mut self.input);
        self.context.render(&self.tree, self.root);
    }
}

fn build_ui(tree: &mut ControlTree) -> ControlId {
    let definition = ControlDefinition::new(ControlKind::Panel)
        .with_property("name", "root")
        .with_property("widthType", "percentage")
        .with_property("heightType", "percentage")
        .with_property("width", 100)
        .with_property("height", 100)
        .with_property("clickThrough", true);
    let root = tree.load(&definition);

    let button = tree.insert(
        Control::new(ControlKind::Button)
            .with_name("greet".to_string())
            .with_placement(Placement::at(Rect::from_xywh(20.0, 60.0, 120.0, 32.0)))
            .with_widget(trellis::Widget::Button(Button::default().with_caption("Hello".to_string()))),
    );
    if let Some(control) = tree.get_mut(button) {
        control
            .on_mouse_enter(|_, _| info!("button: enter"))
            .on_mouse_leave(|_, _| info!("button: leave"))
            .on_click(|cx, event| info!("button: click at {:?} in {:?}", event.local_mouse_pos, cx.control));
    }
    add(tree, root, button);

    for i in 0..3 {
        let radio = tree.create(ControlKind::CheckBox);
        if let Some(control) = tree.get_mut(radio) {
            control.name = format!("radio {i}");
            control.set_rect(Rect::from_xywh(20.0 + i as f32 * 60.0, 20.0, 50.0, 20.0));
            if let Some(check_box) = control.check_box_mut() {
                check_box.behavior = CheckBehavior::Exclusive;
            }
            control.on_check_changed(move |_, event| info!("radio {i}: checked = {}", event.is_checked));
        }
        add(tree, root, radio);
    }

    let field = tree.create(ControlKind::TextBox);
    if let Some(control) = tree.get_mut(field) {
        control.set_rect(Rect::from_xywh(20.0, 110.0, 240.0, 24.0));
        control
            .on_gain_focus(|_, _| info!("text box: focused"))
            .on_text_changed(|_, event| info!("text box: committed {:?}", event.text));
    }
    add(tree, root, field);

    let view = tree.create(ControlKind::TreeView);
    if let Some(tree_view) = tree.get_mut(view).and_then(Control::tree_view_mut) {
        for group in ["fruit", "vegetables"] {
            let parent = tree_view.create_item(group);
            tree_view.add_item(parent);
            for leaf in ["one", "two", "three"] {
                let child = tree_view.create_item(format!("{group}/{leaf}"));
                tree_view.add_child_item(parent, child);
            }
        }
    }
    if let Some(control) = tree.get_mut(view) {
        control.set_rect(Rect::from_xywh(300.0, 20.0, 240.0, 300.0));
        control.on_selection_changed(|cx, event| {
            let Some(tree_view) = cx.this().and_then(Control::tree_view) else {
                return;
            };
            let names: Vec<_> = event
                .selected_items
                .iter()
                .filter_map(|id| tree_view.item(*id))
                .map(|item| item.text.as_str())
                .collect();
            info!("tree view: selected {names:?}");
        });
    }
    add(tree, root, view);

    root
}

fn add(tree: &mut ControlTree, parent: ControlId, child: ControlId) {
    if let Err(err) = tree.add(parent, child) {
        log::error!("failed to build demo tree: {err}");
    }
}

impl ApplicationHandler for Demo {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title("trellis demo")
            .with_inner_size(winit::dpi::LogicalSize::new(800.0, 600.0));
        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
        let size = window.inner_size();
        self.context
            .resize(Vec2::new(size.width as f32, size.height as f32));
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        self.input.handle_winit_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event: ref key_event,
                ..
            } if key_event.logical_key == Key::Named(NamedKey::Escape)
                && key_event.state == ElementState::Pressed =>
            {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut Demo::new()).unwrap();
}
