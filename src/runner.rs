use std::io;
use std::time::{Duration, Instant};

use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop};
use crate::shell::{HostShell, desk_viewport};

/// Runs the desk until the user quits. The terminal is restored on every exit
/// path, including errors.
pub fn run<I, O>(shell: &mut HostShell, input: I, output: &mut O, interval: Duration) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    let (width, height) = output.size()?;
    shell.windows_mut().set_viewport(desk_viewport(width, height));
    tracing::info!(width, height, "desk started");

    let mut event_loop = EventLoop::new(input, interval);
    let result = event_loop.run(|_driver, event| match event {
        None => {
            shell.tick(Instant::now());
            output.draw(|mut frame| shell.render(&mut frame))?;
            Ok(ControlFlow::Continue)
        }
        Some(event) => {
            shell.handle_event(&event);
            if shell.quit_requested() {
                Ok(ControlFlow::Quit)
            } else {
                Ok(ControlFlow::Continue)
            }
        }
    });

    let restored = output.exit();
    tracing::info!(windows = shell.windows().len(), "desk stopped");
    result.and(restored)
}
