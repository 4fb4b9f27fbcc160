use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// What the loop hands its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    Input(Event),
    /// Wall time since the previous tick.
    Tick(Duration),
}

/// The single-threaded pump behind the dashboard.
///
/// Every iteration first delivers a [`LoopEvent::Tick`] with the elapsed
/// time (drives the timer, time tracking and redraw), then waits up to the
/// tick interval for input and drains everything that is queued. All state
/// changes therefore happen on this thread, one handler call at a time.
pub struct EventLoop<D> {
    driver: D,
    tick_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, tick_interval: Duration) -> Self {
        Self {
            driver,
            tick_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, LoopEvent) -> io::Result<ControlFlow>,
    {
        let mut last_tick = Instant::now();
        loop {
            let now = Instant::now();
            let elapsed = now.duration_since(last_tick);
            last_tick = now;
            if handler(&mut self.driver, LoopEvent::Tick(elapsed))? == ControlFlow::Quit {
                return Ok(());
            }

            if self.driver.poll(self.tick_interval)? {
                // Drain bursts (mouse drags) so rendering never lags input.
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, LoopEvent::Input(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted {
        events: VecDeque<Event>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn ticks_then_drains_input_until_quit() {
        let driver = Scripted {
            events: VecDeque::from([key('a'), key('b'), key('q')]),
        };
        let mut event_loop = EventLoop::new(driver, Duration::ZERO);
        let mut seen = Vec::new();
        event_loop
            .run(|_, event| {
                let flow = match &event {
                    LoopEvent::Input(Event::Key(k)) if k.code == KeyCode::Char('q') => {
                        ControlFlow::Quit
                    }
                    _ => ControlFlow::Continue,
                };
                seen.push(event);
                Ok(flow)
            })
            .unwrap();
        assert!(matches!(seen[0], LoopEvent::Tick(_)));
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], LoopEvent::Input(key('q')));
    }
}
