//! Lifecycle of the triangle plugin: what is registered with the host on
//! enable and torn down on disable.

use std::cell::RefCell;
use std::ffi::c_void;
use std::os::raw::c_int;
use std::rc::Rc;

use anyhow::{Context as _, Result};
use tracing::{debug, info, trace, warn};
use xplm_core::callbacks::{draw_callback, menu_callback, read_int_callback, write_int_callback};
use xplm_core::ffi::{DATAREF_EDITOR_SIGNATURE, MSG_ADD_DATAREF};
use xplm_core::{
    refcon_of, DataRef, Host, HostMessage, MenuId, MenuItem, PluginId, WindowCallbacks, WindowId,
    WindowSpec,
};

use crate::config::PluginConfig;
use crate::context::PluginContext;
use crate::overlay::OverlayWindow;
use crate::renderer::TriangleRenderer;

/// What a successful enable left registered with the host. Each field is set
/// as soon as its step succeeds so a failed enable can undo exactly what it
/// did.
#[derive(Debug, Default)]
struct Registrations {
    draw: bool,
    menu_entry: Option<MenuItem>,
    menu: Option<MenuId>,
    toggle_item: Option<MenuItem>,
    dataref: Option<DataRef>,
    announced: bool,
    window: Option<WindowId>,
}

pub struct TrianglePlugin<H: Host + Clone, R: TriangleRenderer> {
    host: H,
    config: PluginConfig,
    context: Rc<RefCell<PluginContext<H, R>>>,
    overlay: Rc<RefCell<OverlayWindow<H, R>>>,
    registrations: Option<Registrations>,
}

impl<H: Host + Clone, R: TriangleRenderer> TrianglePlugin<H, R> {
    pub fn new(host: H, config: PluginConfig, renderer: R) -> Self {
        let context = Rc::new(RefCell::new(PluginContext::new(host.clone(), renderer)));
        let overlay = Rc::new(RefCell::new(OverlayWindow::new(
            host.clone(),
            context.clone(),
            config.window.title.clone(),
        )));
        Self {
            host,
            config,
            context,
            overlay,
            registrations: None,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn context(&self) -> &Rc<RefCell<PluginContext<H, R>>> {
        &self.context
    }

    pub fn is_enabled(&self) -> bool {
        self.registrations.is_some()
    }

    fn context_refcon(&self) -> *mut c_void {
        refcon_of(&*self.context)
    }

    /// Register the draw callback, menu, data accessor and window. On
    /// failure everything registered so far is removed again.
    pub fn enable(&mut self) -> Result<()> {
        if self.is_enabled() {
            debug!("already enabled");
            return Ok(());
        }

        let mut registrations = Registrations::default();
        match self.register(&mut registrations) {
            Ok(()) => {
                self.registrations = Some(registrations);
                info!("enabled");
                Ok(())
            }
            Err(err) => {
                self.unregister(registrations);
                Err(err)
            }
        }
    }

    pub fn disable(&mut self) {
        if let Some(registrations) = self.registrations.take() {
            self.unregister(registrations);
            info!("disabled");
        }
    }

    /// Tear down for unload: disable if needed, then free GPU resources.
    pub fn shutdown(&mut self) {
        self.disable();
        match self.overlay.try_borrow_mut() {
            Ok(mut overlay) => overlay.release(),
            Err(_) => warn!("overlay busy during shutdown"),
        }
        match self.context.try_borrow_mut() {
            Ok(mut context) => context.release(),
            Err(_) => warn!("context busy during shutdown"),
        }
    }

    fn register(&self, registrations: &mut Registrations) -> Result<()> {
        let refcon = self.context_refcon();
        let draw = self.config.draw;

        self.host
            .register_draw_callback(
                draw_callback::<PluginContext<H, R>>,
                draw.phase,
                draw.before,
                refcon,
            )
            .context("registering draw callback")?;
        registrations.draw = true;

        self.register_menu(registrations, refcon)
            .context("creating menu")?;

        let name = &self.config.dataref.name;
        let dataref = self
            .host
            .register_int_accessor(
                name,
                read_int_callback::<PluginContext<H, R>>,
                Some(write_int_callback::<PluginContext<H, R>>),
                refcon,
            )
            .with_context(|| format!("registering data accessor {name}"))?;
        registrations.dataref = Some(dataref);
        if self.config.dataref.announce_to_editor {
            registrations.announced = self.announce_dataref(name);
        }

        let window = self.config.window.clone();
        let spec = WindowSpec {
            geometry: window.geometry,
            visible: window.visible,
            decoration: window.decoration,
            layer: window.layer,
            callbacks: WindowCallbacks::of::<OverlayWindow<H, R>>(),
            refcon: refcon_of(&*self.overlay),
        };
        let id = self.host.create_window(&spec).context("creating window")?;
        registrations.window = Some(id);
        if let Err(err) = self.host.set_window_title(id, &window.title) {
            warn!("window title: {err:#}");
        }

        Ok(())
    }

    fn register_menu(&self, registrations: &mut Registrations, refcon: *mut c_void) -> Result<()> {
        let menu = &self.config.menu;
        let plugins = self.host.plugins_menu()?;

        let entry = self
            .host
            .append_menu_item(plugins, &menu.title, std::ptr::null_mut())?;
        registrations.menu_entry = Some(entry);

        let id = self.host.create_menu(
            &menu.title,
            Some(entry),
            menu_callback::<PluginContext<H, R>>,
            refcon,
        )?;
        registrations.menu = Some(id);

        let toggle = self
            .host
            .append_menu_item(id, &menu.toggle_label, std::ptr::null_mut())?;
        registrations.toggle_item = Some(toggle);
        if let Ok(mut context) = self.context.try_borrow_mut() {
            context.attach_toggle_item(toggle);
        }

        Ok(())
    }

    /// Ask DataRefEditor, when it is loaded, to list our accessor. Returns
    /// whether the request was delivered.
    fn announce_dataref(&self, name: &str) -> bool {
        let Some(editor) = self.host.find_plugin_by_signature(DATAREF_EDITOR_SIGNATURE) else {
            debug!("DataRefEditor not loaded");
            return false;
        };
        match self.host.send_string_message(editor, MSG_ADD_DATAREF, name) {
            Ok(()) => {
                debug!(editor = editor.0, "announced {name}");
                true
            }
            Err(err) => {
                warn!("announcing {name}: {err:#}");
                false
            }
        }
    }

    /// Handle an inter-plugin message. While enabled, an announcement that
    /// found no DataRefEditor is retried, since the editor may load after us.
    pub fn receive_message(&mut self, from: PluginId, message: c_int) {
        match HostMessage::from_raw(message) {
            Some(message) => debug!(?message, from = from.0, "host message"),
            None => trace!(message, from = from.0, "unhandled message"),
        }

        let pending = matches!(&self.registrations, Some(r) if !r.announced && r.dataref.is_some());
        if !pending || !self.config.dataref.announce_to_editor {
            return;
        }
        let announced = self.announce_dataref(&self.config.dataref.name);
        if let Some(registrations) = &mut self.registrations {
            registrations.announced = announced;
        }
    }

    fn unregister(&self, registrations: Registrations) {
        let Registrations {
            draw,
            menu_entry,
            menu,
            toggle_item,
            dataref,
            announced: _,
            window,
        } = registrations;

        if let Some(window) = window {
            self.host.destroy_window(window);
        }
        if let Some(dataref) = dataref {
            self.host.unregister_data_accessor(dataref);
        }
        if toggle_item.is_some() {
            if let Ok(mut context) = self.context.try_borrow_mut() {
                context.detach_toggle_item();
            }
        }
        if let Some(menu) = menu {
            self.host.destroy_menu(menu);
        }
        if let Some(entry) = menu_entry {
            self.host.remove_menu_item(entry);
        }
        if draw {
            let phase = self.config.draw;
            if let Err(err) = self.host.unregister_draw_callback(
                draw_callback::<PluginContext<H, R>>,
                phase.phase,
                phase.before,
                self.context_refcon(),
            ) {
                warn!("{err:#}");
            }
        }
    }
}

impl<H: Host + Clone, R: TriangleRenderer> Drop for TrianglePlugin<H, R> {
    fn drop(&mut self) {
        // The host holds raw pointers into `context` and `overlay`.
        self.disable();
    }
}

#[cfg(not(test))]
mod entry {
    use std::ffi::c_void;
    use std::os::raw::c_int;

    use anyhow::Result;
    use xplm_core::{Host, PluginHandler, PluginId, PluginInfo, XplmHost};

    use super::TrianglePlugin;
    use crate::config::PluginConfig;
    use crate::renderer::GlTriangle;

    impl PluginHandler for TrianglePlugin<XplmHost, GlTriangle> {
        fn info() -> PluginInfo {
            PluginConfig::default().info
        }

        fn start() -> Result<Self> {
            let host = XplmHost;
            let config = PluginConfig::default();
            let (width, height) = host.screen_size();
            let screen = (width.max(0) as u32, height.max(0) as u32);
            let renderer = GlTriangle::new(&config.triangle, screen);
            Ok(Self::new(host, config, renderer))
        }

        fn enable(&mut self) -> Result<()> {
            TrianglePlugin::enable(self)
        }

        fn disable(&mut self) {
            TrianglePlugin::disable(self)
        }

        fn stop(&mut self) {
            self.shutdown()
        }

        fn receive_message(&mut self, from: PluginId, message: c_int, _param: *mut c_void) {
            TrianglePlugin::receive_message(self, from, message)
        }
    }
}
