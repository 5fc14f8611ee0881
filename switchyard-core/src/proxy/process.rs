use crate::proxy::ProxyError;
use crate::proxy::pid::send_signal;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use std::io;
use std::process::{Child, ExitStatus};

/// A proxy master process started in the foreground.
#[derive(Debug)]
pub struct ProxyProcess {
    pid: u32,
    child: Option<Child>,
}

impl ProxyProcess {
    pub fn spawned(child: Child) -> Self {
        Self {
            pid: child.id(),
            child: Some(child),
        }
    }

    /// A process this handle did not spawn and cannot reap.
    pub fn detached(pid: u32) -> Self {
        Self { pid, child: None }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn signal(&self, signal: Signal) -> Result<(), ProxyError> {
        send_signal(Pid::from_raw(self.pid as i32), signal)
    }

    /// Exit status if the process has exited. Detached handles never report one.
    pub fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
        match &mut self.child {
            Some(child) => child.try_wait(),
            None => Ok(None),
        }
    }

    pub fn kill(&mut self) -> io::Result<()> {
        match &mut self.child {
            Some(child) => child.kill(),
            None => Ok(()),
        }
    }
}
