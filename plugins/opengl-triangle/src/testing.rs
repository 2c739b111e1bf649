//! Test doubles for driving the plugin without a simulator.
//!
//! [`MockHost`] records every call and keeps the callbacks and refcons the
//! plugin registers, so tests can invoke them the way the host would.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::c_void;
use std::os::raw::c_int;
use std::rc::Rc;

use anyhow::{bail, Result};
use xplm_core::ffi::{XPLMDrawCallback_f, XPLMGetDatai_f, XPLMMenuHandler_f, XPLMSetDatai_f};
use xplm_core::{
    DataRef, DrawPhase, GraphicsState, Host, MenuId, MenuItem, MouseStatus, PluginId, WindowGeometry,
    WindowId, WindowSpec,
};

use crate::renderer::TriangleRenderer;

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    RegisterDraw { phase: DrawPhase, before: bool },
    UnregisterDraw { phase: DrawPhase, before: bool },
    SetGraphicsState(GraphicsState),
    CreateMenu { name: String, parent: Option<MenuItem> },
    AppendMenuItem { menu: MenuId, name: String },
    CheckMenuItem { item: MenuItem, checked: bool },
    RemoveMenuItem(MenuItem),
    DestroyMenu(MenuId),
    RegisterAccessor { name: String, writable: bool },
    UnregisterAccessor(DataRef),
    SendMessage { plugin: PluginId, message: c_int, payload: String },
    CreateWindow(WindowGeometry),
    DestroyWindow(WindowId),
    SetWindowTitle { window: WindowId, title: String },
    DrawString { x: i32, y: i32, text: String },
}

/// Host operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    DrawCallback,
    Menu,
    Accessor,
    Window,
}

struct DrawRegistration {
    callback: XPLMDrawCallback_f,
    phase: DrawPhase,
    before: bool,
    refcon: *mut c_void,
}

struct MenuRegistration {
    id: MenuId,
    handler: XPLMMenuHandler_f,
    menu_ref: *mut c_void,
}

struct ItemRegistration {
    item: MenuItem,
    name: String,
    item_ref: *mut c_void,
}

struct AccessorRegistration {
    id: DataRef,
    name: String,
    read: XPLMGetDatai_f,
    write: Option<XPLMSetDatai_f>,
    refcon: *mut c_void,
}

struct State {
    calls: Vec<HostCall>,
    next_handle: usize,
    plugins_menu: MenuId,
    draws: Vec<DrawRegistration>,
    menus: Vec<MenuRegistration>,
    items: Vec<ItemRegistration>,
    accessors: Vec<AccessorRegistration>,
    windows: Vec<(WindowId, WindowSpec)>,
    geometries: HashMap<WindowId, WindowGeometry>,
    plugins: HashMap<String, PluginId>,
    failures: Vec<Failure>,
    screen: (i32, i32),
}

impl State {
    fn handle(&mut self) -> *mut c_void {
        self.next_handle += 1;
        (0x1000 + self.next_handle * 0x10) as *mut c_void
    }

    fn fails(&self, failure: Failure) -> bool {
        self.failures.contains(&failure)
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            next_handle: 0,
            plugins_menu: MenuId::from_raw(0x10 as *mut c_void).expect("non-null"),
            draws: Vec::new(),
            menus: Vec::new(),
            items: Vec::new(),
            accessors: Vec::new(),
            windows: Vec::new(),
            geometries: HashMap::new(),
            plugins: HashMap::new(),
            failures: Vec::new(),
            screen: (1920, 1080),
        }
    }
}

/// In-memory [`Host`]. Clones share state.
#[derive(Clone, Default)]
pub struct MockHost {
    state: Rc<RefCell<State>>,
}

impl MockHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn fail_on(&self, failure: Failure) {
        self.state.borrow_mut().failures.push(failure);
    }

    pub fn load_plugin(&self, signature: &str, id: PluginId) {
        self.state.borrow_mut().plugins.insert(signature.to_string(), id);
    }

    /// A menu handle the host never created.
    pub fn fake_menu(&self) -> MenuId {
        let raw = self.state.borrow_mut().handle();
        MenuId::from_raw(raw).expect("non-null")
    }

    /// A window handle with known geometry, without registered callbacks.
    pub fn fake_window(&self, geometry: WindowGeometry) -> WindowId {
        let mut state = self.state.borrow_mut();
        let window = WindowId::from_raw(state.handle()).expect("non-null");
        state.geometries.insert(window, geometry);
        window
    }

    /// Draw callbacks, menus, menu items, accessors and windows still
    /// registered.
    pub fn live_registrations(&self) -> usize {
        let state = self.state.borrow();
        state.draws.len()
            + state.menus.len()
            + state.items.len()
            + state.accessors.len()
            + state.windows.len()
    }

    pub fn menu_item(&self, name: &str) -> Option<MenuItem> {
        let state = self.state.borrow();
        state.items.iter().find(|item| item.name == name).map(|item| item.item)
    }

    /// The last check state the plugin set on `item`.
    pub fn is_checked(&self, item: MenuItem) -> Option<bool> {
        self.state.borrow().calls.iter().rev().find_map(|call| match call {
            HostCall::CheckMenuItem { item: checked_item, checked } if *checked_item == item => {
                Some(*checked)
            }
            _ => None,
        })
    }

    /// Run every registered draw callback once, as a frame would.
    pub fn render_frame(&self) -> Vec<c_int> {
        let targets: Vec<_> = {
            let state = self.state.borrow();
            state
                .draws
                .iter()
                .map(|draw| (draw.callback, draw.phase, draw.before, draw.refcon))
                .collect()
        };
        targets
            .into_iter()
            .map(|(callback, phase, before, refcon)| unsafe {
                callback(phase.raw(), before as c_int, refcon)
            })
            .collect()
    }

    /// Click the menu item labelled `name`. Returns `false` when there is
    /// no such item.
    pub fn click_menu_item(&self, name: &str) -> bool {
        let target = {
            let state = self.state.borrow();
            state.items.iter().find(|item| item.name == name).and_then(|item| {
                state
                    .menus
                    .iter()
                    .find(|menu| menu.id == item.item.menu)
                    .map(|menu| (menu.handler, menu.menu_ref, item.item_ref))
            })
        };
        match target {
            Some((handler, menu_ref, item_ref)) => {
                unsafe { handler(menu_ref, item_ref) };
                true
            }
            None => false,
        }
    }

    pub fn read_dataref(&self, name: &str) -> Option<i32> {
        let (read, refcon) = {
            let state = self.state.borrow();
            let accessor = state.accessors.iter().find(|accessor| accessor.name == name)?;
            (accessor.read, accessor.refcon)
        };
        Some(unsafe { read(refcon) })
    }

    /// Returns `false` when the accessor is missing or read-only.
    pub fn write_dataref(&self, name: &str, value: i32) -> bool {
        let target = {
            let state = self.state.borrow();
            state
                .accessors
                .iter()
                .find(|accessor| accessor.name == name)
                .and_then(|accessor| accessor.write.map(|write| (write, accessor.refcon)))
        };
        match target {
            Some((write, refcon)) => {
                unsafe { write(refcon, value) };
                true
            }
            None => false,
        }
    }

    pub fn windows(&self) -> Vec<WindowId> {
        self.state.borrow().windows.iter().map(|(id, _)| *id).collect()
    }

    /// Run the draw callback of every window.
    pub fn draw_windows(&self) {
        let targets: Vec<_> = {
            let state = self.state.borrow();
            state
                .windows
                .iter()
                .map(|(id, spec)| (id.as_raw(), spec.callbacks.draw, spec.refcon))
                .collect()
        };
        for (window, draw, refcon) in targets {
            unsafe { draw(window, refcon) };
        }
    }

    /// Deliver a left click to `window`. Returns whether it was consumed.
    pub fn click_window(&self, window: WindowId, x: i32, y: i32, status: MouseStatus) -> bool {
        let target = {
            let state = self.state.borrow();
            state
                .windows
                .iter()
                .find(|(id, _)| *id == window)
                .map(|(_, spec)| (spec.callbacks.mouse_click, spec.refcon))
        };
        match target {
            Some((click, refcon)) => unsafe { click(window.as_raw(), x, y, status as c_int, refcon) != 0 },
            None => false,
        }
    }

    fn record(&self, call: HostCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl Host for MockHost {
    fn register_draw_callback(
        &self,
        callback: XPLMDrawCallback_f,
        phase: DrawPhase,
        before: bool,
        refcon: *mut c_void,
    ) -> Result<()> {
        self.record(HostCall::RegisterDraw { phase, before });
        let mut state = self.state.borrow_mut();
        if state.fails(Failure::DrawCallback) {
            bail!("draw callback rejected");
        }
        state.draws.push(DrawRegistration {
            callback,
            phase,
            before,
            refcon,
        });
        Ok(())
    }

    fn unregister_draw_callback(
        &self,
        _callback: XPLMDrawCallback_f,
        phase: DrawPhase,
        before: bool,
        refcon: *mut c_void,
    ) -> Result<()> {
        self.record(HostCall::UnregisterDraw { phase, before });
        let mut state = self.state.borrow_mut();
        let Some(index) = state
            .draws
            .iter()
            .position(|draw| draw.phase == phase && draw.before == before && draw.refcon == refcon)
        else {
            bail!("no such draw callback");
        };
        state.draws.remove(index);
        Ok(())
    }

    fn set_graphics_state(&self, state: GraphicsState) {
        self.record(HostCall::SetGraphicsState(state));
    }

    fn plugins_menu(&self) -> Result<MenuId> {
        Ok(self.state.borrow().plugins_menu)
    }

    fn create_menu(
        &self,
        name: &str,
        parent: Option<MenuItem>,
        handler: XPLMMenuHandler_f,
        menu_ref: *mut c_void,
    ) -> Result<MenuId> {
        self.record(HostCall::CreateMenu {
            name: name.to_string(),
            parent,
        });
        let mut state = self.state.borrow_mut();
        if state.fails(Failure::Menu) {
            bail!("menu rejected");
        }
        let raw = state.handle();
        let id = MenuId::from_raw(raw).expect("non-null");
        state.menus.push(MenuRegistration {
            id,
            handler,
            menu_ref,
        });
        Ok(id)
    }

    fn append_menu_item(&self, menu: MenuId, name: &str, item_ref: *mut c_void) -> Result<MenuItem> {
        self.record(HostCall::AppendMenuItem {
            menu,
            name: name.to_string(),
        });
        let mut state = self.state.borrow_mut();
        let index = state.items.iter().filter(|item| item.item.menu == menu).count() as c_int;
        let item = MenuItem { menu, index };
        state.items.push(ItemRegistration {
            item,
            name: name.to_string(),
            item_ref,
        });
        Ok(item)
    }

    fn check_menu_item(&self, item: MenuItem, checked: bool) {
        self.record(HostCall::CheckMenuItem { item, checked });
    }

    fn remove_menu_item(&self, item: MenuItem) {
        self.record(HostCall::RemoveMenuItem(item));
        self.state.borrow_mut().items.retain(|registered| registered.item != item);
    }

    fn destroy_menu(&self, menu: MenuId) {
        self.record(HostCall::DestroyMenu(menu));
        let mut state = self.state.borrow_mut();
        state.menus.retain(|registered| registered.id != menu);
        state.items.retain(|registered| registered.item.menu != menu);
    }

    fn register_int_accessor(
        &self,
        name: &str,
        read: XPLMGetDatai_f,
        write: Option<XPLMSetDatai_f>,
        refcon: *mut c_void,
    ) -> Result<DataRef> {
        self.record(HostCall::RegisterAccessor {
            name: name.to_string(),
            writable: write.is_some(),
        });
        let mut state = self.state.borrow_mut();
        if state.fails(Failure::Accessor) {
            bail!("accessor rejected");
        }
        let raw = state.handle();
        let id = DataRef::from_raw(raw).expect("non-null");
        state.accessors.push(AccessorRegistration {
            id,
            name: name.to_string(),
            read,
            write,
            refcon,
        });
        Ok(id)
    }

    fn unregister_data_accessor(&self, dataref: DataRef) {
        self.record(HostCall::UnregisterAccessor(dataref));
        self.state.borrow_mut().accessors.retain(|accessor| accessor.id != dataref);
    }

    fn find_plugin_by_signature(&self, signature: &str) -> Option<PluginId> {
        self.state.borrow().plugins.get(signature).copied()
    }

    fn send_string_message(&self, plugin: PluginId, message: c_int, payload: &str) -> Result<()> {
        self.record(HostCall::SendMessage {
            plugin,
            message,
            payload: payload.to_string(),
        });
        Ok(())
    }

    fn create_window(&self, spec: &WindowSpec) -> Result<WindowId> {
        self.record(HostCall::CreateWindow(spec.geometry));
        let mut state = self.state.borrow_mut();
        if state.fails(Failure::Window) {
            bail!("window rejected");
        }
        let raw = state.handle();
        let id = WindowId::from_raw(raw).expect("non-null");
        state.geometries.insert(id, spec.geometry);
        state.windows.push((id, *spec));
        Ok(id)
    }

    fn destroy_window(&self, window: WindowId) {
        self.record(HostCall::DestroyWindow(window));
        let mut state = self.state.borrow_mut();
        state.windows.retain(|(id, _)| *id != window);
        state.geometries.remove(&window);
    }

    fn set_window_title(&self, window: WindowId, title: &str) -> Result<()> {
        self.record(HostCall::SetWindowTitle {
            window,
            title: title.to_string(),
        });
        Ok(())
    }

    fn window_geometry(&self, window: WindowId) -> WindowGeometry {
        self.state
            .borrow()
            .geometries
            .get(&window)
            .copied()
            .unwrap_or_default()
    }

    fn screen_size(&self) -> (i32, i32) {
        self.state.borrow().screen
    }

    fn draw_string(&self, _color: [f32; 3], x: i32, y: i32, text: &str) -> Result<()> {
        self.record(HostCall::DrawString {
            x,
            y,
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Counts what the plugin asks of its renderer.
#[derive(Debug, Default)]
pub struct MockRenderer {
    pub draws: usize,
    pub releases: usize,
    /// Behave like a renderer whose shaders failed to build.
    pub broken: bool,
}

impl MockRenderer {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }
}

impl TriangleRenderer for MockRenderer {
    fn draw(&mut self) -> bool {
        if self.broken || self.releases > 0 {
            return false;
        }
        self.draws += 1;
        true
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}
