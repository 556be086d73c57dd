use winit::{
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Fullscreen, Window},
};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use tracing::{error, info, warn};

use escape_room::{logging, ui, view, controller, AppError, GameConfig};

use controller::{FocusMode, FrameDriver, FrameSnapshot, InputEvent, InputState};
use controller::input::native::{self, KeyBindings};
use view::{BoxRenderer, GpuContext, SurfaceImages};

struct App {
    // Core GPU resources
    gpu: GpuContext,
    size: winit::dpi::PhysicalSize<u32>,
    window: Arc<Window>,
    box_renderer: BoxRenderer,

    // egui
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
    final_image: egui::TextureHandle,

    // Game state
    driver: FrameDriver,
    input_state: InputState,
    bindings: KeyBindings,
    focus: Option<FocusMode>,

    // Frame timing
    last_frame_time: Instant,
}

impl App {
    async fn new(window: Arc<Window>, config: &GameConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone()).map_err(AppError::from)?;
        let gpu = GpuContext::new(&instance, surface, size.width, size.height, config.vsync)
            .await
            .context("initializing GPU")?;

        let surfaces = SurfaceImages::load(config).context("loading room textures")?;
        let box_renderer = BoxRenderer::new(&gpu.device, &gpu.queue, gpu.format, &surfaces, size.width, size.height);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.format,
            egui_wgpu::RendererOptions::default(),
        );
        let final_image = ui::load_final_image(&egui_ctx, &config.final_image)
            .context("loading final image")?;

        let driver = FrameDriver::new(config, size.width, size.height);

        Ok(Self {
            gpu,
            size,
            window,
            box_renderer,
            egui_renderer,
            egui_state,
            egui_ctx,
            final_image,
            driver,
            input_state: InputState::new(),
            bindings: KeyBindings::default(),
            focus: None,
            last_frame_time: Instant::now(),
        })
    }

    fn input(&mut self, event: &WindowEvent) {
        // egui only tracks state here; it never swallows game input
        let _ = self.egui_state.on_window_event(self.window.as_ref(), event);

        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                for input in native::key_event_to_input(&self.bindings, event) {
                    self.input_state.process_event(&input);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(input) = native::mouse_button_to_input(*state, *button) {
                    self.input_state.process_event(&input);
                }
            }
            WindowEvent::Focused(false) => {
                self.input_state.process_event(&InputEvent::FocusLost);
            }
            _ => {}
        }
    }

    fn handle_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.input_state.process_event(&InputEvent::MouseMove { dx: dx as f32, dy: dy as f32 });
    }

    /// Capture the pointer for mouse-look, or free it for typing.
    fn sync_focus(&mut self) {
        let wanted = self.driver.focus_mode();
        if self.focus == Some(wanted) {
            return;
        }
        self.focus = Some(wanted);

        let locked = wanted == FocusMode::Look;
        if locked {
            let grabbed = self.window.set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                warn!("could not capture cursor: {e}");
            }
        } else if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
            warn!("could not release cursor: {e}");
        }
        self.window.set_cursor_visible(!locked);
        self.input_state.process_event(&InputEvent::PointerLockChanged { locked });
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.resize(new_size.width, new_size.height);
            self.box_renderer.resize(&self.gpu.device, new_size.width, new_size.height);
            self.driver.set_aspect(new_size.width, new_size.height);
        }
    }

    fn update(&mut self) -> FrameSnapshot {
        let now = Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        let snapshot = self.driver.tick(&mut self.input_state, dt);
        self.sync_focus();
        snapshot
    }

    fn render(&mut self, snapshot: &FrameSnapshot) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.box_renderer.prepare(&self.gpu.queue, snapshot);

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let egui_output = self.egui_ctx.run(raw_input, |ctx| {
            ui::build_ui(ctx, snapshot, &self.final_image);
        });
        self.egui_state.handle_platform_output(&self.window, egui_output.platform_output);

        let pixels_per_point = self.window.scale_factor() as f32;
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.config.width, self.gpu.config.height],
            pixels_per_point,
        };
        let primitives = self.egui_ctx.tessellate(egui_output.shapes, pixels_per_point);

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(&self.gpu.device, &self.gpu.queue, &mut encoder, &primitives, &screen_descriptor);

        self.box_renderer.draw(&mut encoder, &view);

        // Render egui on top
        {
            let egui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(&mut egui_pass.forget_lifetime(), &primitives, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn redraw(&mut self, elwt: &ActiveEventLoop) {
        let snapshot = self.update();
        if self.driver.should_exit() {
            info!("game over, closing window");
            elwt.exit();
            return;
        }

        match self.render(&snapshot) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.resize(self.size),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                elwt.exit();
            }
            Err(e) => warn!("{:?}", e),
        }
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let config = GameConfig::load();

    let event_loop = EventLoop::new().map_err(AppError::from)?;
    let mut window_attributes = Window::default_attributes()
        .with_title("Escape Room - Board Puzzle")
        .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));
    if config.fullscreen {
        window_attributes = window_attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = Arc::new(event_loop.create_window(window_attributes).map_err(AppError::from)?);

    let mut app = pollster::block_on(App::new(window.clone(), &config))?;
    info!("escape room ready");

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                app.input(event);
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::KeyboardInput {
                        event: KeyEvent { physical_key: PhysicalKey::Code(KeyCode::Escape), state: ElementState::Pressed, .. },
                        ..
                    } if app.driver.quit_key_allowed() => {
                        info!("escape pressed, quitting");
                        elwt.exit();
                    }
                    WindowEvent::Resized(physical_size) => {
                        app.resize(*physical_size);
                    }
                    WindowEvent::RedrawRequested => app.redraw(elwt),
                    _ => {}
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.handle_mouse_motion(delta.0, delta.1);
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    }).map_err(AppError::from)?;

    Ok(())
}
