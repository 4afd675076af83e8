//! Windowed demo: a spinning checkerboard quad.
//!
//! Opens an SDL2 window with a GL 3.3 core context and drives a
//! [`TextureRenderer`] with the stock unit square and a generated
//! checkerboard texture. Escape or closing the window quits.

use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Vec3, Vec4};
use glow::HasContext;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::video::{GLProfile, SwapInterval};

use meshtex::{MeshData, TextureRenderer};

const WINDOW_TITLE: &str = "meshtex quad demo";
const WINDOW_WIDTH: u32 = 960;
const WINDOW_HEIGHT: u32 = 720;
const CHECKER_SIZE: u32 = 8;

fn setup_logger() -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

/// Tightly packed RGB checkerboard, one pixel per cell.
fn checkerboard(size: u32) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((size * size * 3) as usize);
    for y in 0..size {
        for x in 0..size {
            if (x + y) % 2 == 0 {
                rgb.extend_from_slice(&[235, 119, 52]);
            } else {
                rgb.extend_from_slice(&[36, 36, 44]);
            }
        }
    }
    rgb
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger()?;

    let sdl = sdl2::init()?;
    let video_subsystem = sdl.video()?;
    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::Core);
    gl_attr.set_context_version(3, 3);

    let window = video_subsystem
        .window(WINDOW_TITLE, WINDOW_WIDTH, WINDOW_HEIGHT)
        .opengl()
        .resizable()
        .build()?;
    let gl_context = window.gl_create_context()?;
    window.gl_make_current(&gl_context)?;
    if let Err(e) = video_subsystem.gl_set_swap_interval(SwapInterval::VSync) {
        log::warn!("vsync not available: {e}");
    }

    let gl = unsafe {
        glow::Context::from_loader_function(|s| {
            video_subsystem.gl_get_proc_address(s) as *const _
        })
    };
    let gl = Arc::new(gl);
    let mut event_pump = sdl.event_pump()?;

    let mut renderer = TextureRenderer::new(&gl)?;
    renderer.load_mesh(&MeshData::unit_square())?;
    renderer.load_texture(CHECKER_SIZE, CHECKER_SIZE, &checkerboard(CHECKER_SIZE))?;
    log::info!("renderer ready, drawing {} faces", renderer.face_count());

    let start = Instant::now();
    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(w, h),
                    ..
                } => unsafe {
                    gl.viewport(0, 0, w, h);
                },
                _ => {}
            }
        }

        let (w, h) = window.drawable_size();
        let aspect = Mat4::from_scale(Vec3::new(h as f32 / w as f32, 1.0, 1.0));
        let spin = Mat4::from_rotation_z(start.elapsed().as_secs_f32());

        renderer.clear_frame(Vec4::new(0.08, 0.09, 0.11, 1.0));
        renderer.set_transform(aspect * spin);
        renderer.display_faces()?;
        window.gl_swap_window();
    }

    Ok(())
}
