use std::io;
use std::time::Duration;

use crate::dashboard::Dashboard;
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop, LoopEvent};

/// Drive `dashboard` until the user quits.
///
/// Input bursts are applied as they arrive and the screen is redrawn on
/// every tick, which the loop issues right after each burst. The workspace
/// is saved and the terminal restored even when the loop fails.
pub fn run_dashboard<O, D>(
    output: &mut O,
    input: D,
    dashboard: &mut Dashboard,
    tick_interval: Duration,
) -> io::Result<()>
where
    O: OutputDriver,
    D: InputDriver,
{
    output.enter()?;
    let mut event_loop = EventLoop::new(input, tick_interval);
    let mut result = event_loop.driver().set_mouse_capture(true);
    if result.is_ok() {
        result = event_loop.run(|_, event| match event {
            LoopEvent::Tick(elapsed) => {
                dashboard.tick(elapsed);
                output.draw(|frame| dashboard.render(frame))?;
                Ok(ControlFlow::Continue)
            }
            LoopEvent::Input(event) => Ok(dashboard.handle_event(&event)),
        });
    }

    dashboard.shutdown();
    if let Err(err) = event_loop.driver().set_mouse_capture(false) {
        tracing::debug!(error = %err, "failed to release mouse capture");
    }
    output.exit()?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::Dock;
    use crate::layout::CellScale;
    use crate::project::{MemoryStorage, ProjectStore};
    use crate::timer::ProductivityTimer;
    use crate::window::{Viewport, WindowManager};
    use crate::workspace::Workspace;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::{Frame, Terminal};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Event>);

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.0.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    struct TestOutput {
        terminal: Terminal<TestBackend>,
        entered: bool,
        frames: usize,
    }

    impl OutputDriver for TestOutput {
        fn enter(&mut self) -> io::Result<()> {
            self.entered = true;
            Ok(())
        }

        fn exit(&mut self) -> io::Result<()> {
            self.entered = false;
            Ok(())
        }

        fn draw<F>(&mut self, f: F) -> io::Result<()>
        where
            F: FnOnce(&mut Frame<'_>),
        {
            self.frames += 1;
            self.terminal
                .draw(f)
                .map(|_| ())
                .map_err(|err| io::Error::other(err.to_string()))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn runs_until_quit_and_saves() {
        let storage = MemoryStorage::new();
        let store = ProjectStore::open(storage.clone());
        let wm = WindowManager::with_seed(Viewport::new(1920, 1080), 5);
        let ws = Workspace::new(store, wm, ProductivityTimer::default(), Dock::default());
        let mut dash = Dashboard::new(ws, CellScale::default());
        let mut output = TestOutput {
            terminal: Terminal::new(TestBackend::new(120, 40)).unwrap(),
            entered: false,
            frames: 0,
        };
        let input = Scripted(VecDeque::from([key('3'), key('q')]));

        run_dashboard(&mut output, input, &mut dash, Duration::ZERO).unwrap();

        assert!(!output.entered);
        assert!(output.frames >= 1);
        assert_eq!(dash.workspace().windows().len(), 1);

        let reopened = ProjectStore::open(storage);
        assert_eq!(reopened.current().windows.len(), 1);
        assert_eq!(reopened.current().windows[0].title, "Notion");
    }
}
