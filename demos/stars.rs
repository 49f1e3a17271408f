use polystroke::{background_at, renderers::GlRenderer, ColorSequence, Frame, Path, StrokeSettings, Vec2};

const FRAME: std::time::Duration = std::time::Duration::from_micros(1_000_000 / 60);

fn demo_path() -> Path {
    Path::builder()
        .move_to(-0.7, -0.7)
        .line_to(-0.3, -0.7)
        .line_to(-0.4, -0.4)
        .line_to(-0.2, -0.4)
        .close()
        .move_to(0.5, 0.5)
        .quadratic_to(0.25, 0.0, 0.0, 0.0)
        .add_star(Vec2::new(-0.5, 0.5), 8, 0.2, 0.3)
        .add_ellipse(0.3, -0.75, 0.4, 0.6)
        .build()
}

fn main() {
    env_logger::init();

    let mut events_loop = glutin::EventsLoop::new();
    let window_builder = glutin::WindowBuilder::new()
        .with_dimensions(glutin::dpi::LogicalSize::new(800.0, 800.0))
        .with_title("polystroke");
    let context = glutin::ContextBuilder::new()
        .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGl, (3, 2)))
        .with_gl_profile(glutin::GlProfile::Core)
        .with_multisampling(4)
        .build_windowed(window_builder, &events_loop)
        .unwrap();
    let context = unsafe { context.make_current() }.unwrap();

    gl::load_with(|symbol| context.get_proc_address(symbol) as *const _);

    let mut renderer = match GlRenderer::new() {
        Ok(renderer) => renderer,
        Err(error) => {
            log::error!("{}", error);
            std::process::exit(1);
        }
    };

    let path = demo_path();
    let settings = StrokeSettings::default();

    // fixed for the whole run so every subpath keeps its color
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);
    let mut colors = ColorSequence::new(seed);

    let start = std::time::Instant::now();
    let mut running = true;
    let mut now = std::time::Instant::now();
    while running {
        let mut frame = Frame::new(&mut renderer);
        frame.clear(background_at(start.elapsed().as_millis() as u64));
        frame.draw_path(&path, &settings, &mut colors);

        context.swap_buffers().unwrap();

        events_loop.poll_events(|event| match event {
            glutin::Event::WindowEvent { event, .. } => match event {
                glutin::WindowEvent::CloseRequested => {
                    running = false;
                }
                glutin::WindowEvent::Resized(size) => {
                    let size = size.to_physical(context.window().get_hidpi_factor());
                    context.resize(size);
                    unsafe { gl::Viewport(0, 0, size.width as i32, size.height as i32); }
                }
                _ => {}
            },
            _ => {}
        });

        let elapsed = now.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
        now = std::time::Instant::now();
    }
}
