use thiserror::Error;

/// Boxed driver error, so every backend can report through the same type.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failure while driving the board: a GPIO operation, or setting up the
/// thread and signal handler the GPIO loop runs on. All of these are fatal
/// to the process.
#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("failed to initialize GPIO: {0}")]
    Init(#[source] DriverError),

    #[error("failed to configure input pin {pin}: {source}")]
    ConfigureInput { pin: u8, source: DriverError },

    #[error("failed to configure output pin {pin}: {source}")]
    ConfigureOutput { pin: u8, source: DriverError },

    #[error("failed waiting for an edge on pin {pin}: {source}")]
    WaitForEdge { pin: u8, source: DriverError },

    #[error("failed to set PWM on pin {pin}: {source}")]
    Pwm { pin: u8, source: DriverError },

    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, HardwareError>;
