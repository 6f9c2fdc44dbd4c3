use crate::audio::{self, AudioGraph};
use crate::video::VideoAudio;
use eye_core::{AudioCommand, Session};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Handles shared by every callback and async completion.
#[derive(Clone)]
pub struct Host {
    pub session: Rc<RefCell<Session>>,
    pub audio: Option<Rc<AudioGraph>>,
    pub video: Option<VideoAudio>,
    pub document: web::Document,
    started: Instant,
}

impl Host {
    pub fn new(
        session: Session,
        audio: Option<Rc<AudioGraph>>,
        video: Option<VideoAudio>,
        document: web::Document,
    ) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
            audio,
            video,
            document,
            started: Instant::now(),
        }
    }

    /// Seconds since startup; the clock the unlock retry policy runs on.
    pub fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Borrow the session, collect the commands it emits, release the borrow,
    /// then execute them.
    pub fn with_session<R>(
        &self,
        f: impl FnOnce(&mut Session, &mut Vec<AudioCommand>) -> R,
    ) -> R {
        let mut out = Vec::new();
        let result = {
            let mut session = self.session.borrow_mut();
            f(&mut session, &mut out)
        };
        audio::dispatch(self, out);
        result
    }
}
