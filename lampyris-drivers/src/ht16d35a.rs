//! HT16D35A RGB LED matrix controller driver
//!
//! Low-level driver for the Holtek HT16D35A constant-current LED
//! controller behind the badge's LED matrix. This layer owns the
//! framebuffer and the wire protocol; what to display and when to
//! animate is application code living above it.
//!
//! # Wire protocol
//!
//! The controller speaks SPI mode 0, MSB first. Every command is one
//! framed transaction: chip select asserted, a command byte plus its
//! parameters clocked out, chip select released. There is no
//! acknowledgment read-back; correctness depends entirely on send
//! ordering. A display update sends, per COM (column), one frame of
//! `[WRITE_DISPLAY, com address, 28 row bytes]`.
//!
//! # Color depth
//!
//! The framebuffer always holds 8 bits per channel. The controller's
//! grayscale mode only has 6, so each byte is right-shifted by two at
//! transmission time; the precision loss is local to the wire encoding
//! and never touches the stored model.

use embedded_hal::spi::SpiDevice;
use heapless::Vec;

/// Command definitions.
pub mod cmd {
    /// Write the buffer that follows to display memory.
    pub const WRITE_DISPLAY: u8 = 0x80;
    /// Read display memory back.
    pub const READ_DISPLAY: u8 = 0x81;
    /// Read the status register.
    pub const READ_STATUS: u8 = 0x71;
    /// Toggle between binary and grayscale mode.
    pub const GRAY_MODE: u8 = 0x31;
    /// `GRAY_MODE` payload selecting 6-bit grayscale.
    pub const GRAY_MODE_GRAYSCALE: u8 = 0x00;
    /// `GRAY_MODE` payload selecting binary (black & white) mode.
    pub const GRAY_MODE_BINARY: u8 = 0x01;
    /// Select the number of COM (column) pins in use.
    pub const COM_NUM: u8 = 0x32;
    /// Control blinking.
    pub const BLINKING: u8 = 0x33;
    /// System and oscillator control.
    pub const SYS_OSC_CTL: u8 = 0x35;
    /// `SYS_OSC_CTL` payload: everything off (standby).
    pub const SYS_OSC_STANDBY: u8 = 0b00;
    /// `SYS_OSC_CTL` payload: oscillator on, display off.
    pub const SYS_OSC_ON: u8 = 0b10;
    /// `SYS_OSC_CTL` payload: oscillator and display on.
    pub const SYS_OSC_DISPLAY_ON: u8 = 0b11;
    /// Set the constant-current ratio.
    pub const CURRENT_RATIO: u8 = 0x36;
    /// Set the global brightness.
    pub const GLOBAL_BRIGHTNESS: u8 = 0x37;
    /// COM pin enable mask.
    pub const COM_PIN_CTL: u8 = 0x41;
    /// ROW pin enable mask (four data bytes, 28 rows).
    pub const ROW_PIN_CTL: u8 = 0x42;
    /// Software reset.
    pub const SW_RESET: u8 = 0xCC;
}

/// Initial global brightness setting.
pub const BRIGHTNESS_DEFAULT: u8 = 0x30;
/// Lowest brightness the controller accepts. Not a way to blank the
/// display; use [`Ht16d35a::display_off`] for that.
pub const BRIGHTNESS_MIN: u8 = 0x01;
/// Highest brightness the controller accepts.
pub const BRIGHTNESS_MAX: u8 = 0x40;

/// ROW pins per COM.
pub const ROWS_PER_COM: usize = 28;
/// COM pins on the controller.
pub const MAX_COMS: usize = 8;
/// Most composite RGB LEDs an address map can describe (9 per COM in
/// the badge layout).
pub const MAX_LEDS: usize = 72;

/// Constant-current ratio written at init. All-ones is the weakest
/// setting; the maximum would cook a battery-powered badge.
const CURRENT_RATIO_DEFAULT: u8 = 0b0111;

/// 8-bit-per-channel color, the framebuffer's native depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// All channels off.
    pub const OFF: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel by index: 0 = red, 1 = green, 2 = blue.
    fn channel(self, index: u8) -> u8 {
        match index {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }
}

/// 16-bit-per-channel color, the convention of animation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb16 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Rgb16 {
    pub const fn new(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb16> for Rgb8 {
    fn from(color: Rgb16) -> Self {
        Self {
            r: (color.r >> 8) as u8,
            g: (color.g >> 8) as u8,
            b: (color.b >> 8) as u8,
        }
    }
}

/// What a physical (COM, ROW) position drives: `(led index, channel)`.
type RowEntry = Option<(u8, u8)>;

/// Fixed lookup from logical `(led, channel)` to physical `(com, row)`.
///
/// Built once at initialization and read-only afterwards. Stored as
/// the inverse per-COM row table the transmit path walks. Rows with no
/// LED behind them stay `None` and transmit zero, so sparse layouts
/// work without special cases.
///
/// The controller has an on-chip remapping feature that could do this
/// instead; we keep the mapping host-side where it is testable.
#[derive(Debug, Clone)]
pub struct AddressMap {
    led_count: usize,
    coms: usize,
    rows: [[RowEntry; ROWS_PER_COM]; MAX_COMS],
}

impl AddressMap {
    /// Build a map from per-channel positions: `entries[led * 3 + c]`
    /// is the `(com, row)` driving channel `c` (r, g, b) of `led`.
    ///
    /// Entries outside the physical matrix are silently ignored, per
    /// the badge's clamp-don't-fault configuration policy.
    pub fn new(entries: &[(u8, u8)]) -> Self {
        let led_count = (entries.len() / 3).min(MAX_LEDS);
        let mut rows = [[None; ROWS_PER_COM]; MAX_COMS];
        let mut coms = 0usize;

        for (index, &(com, row)) in entries.iter().enumerate().take(led_count * 3) {
            let (com, row) = (com as usize, row as usize);
            if com >= MAX_COMS || row >= ROWS_PER_COM {
                continue;
            }
            rows[com][row] = Some(((index / 3) as u8, (index % 3) as u8));
            coms = coms.max(com + 1);
        }

        Self {
            led_count,
            coms: coms.max(1),
            rows,
        }
    }

    /// The badge board layout: 9 LEDs per COM, each occupying three
    /// consecutive rows in blue, green, red order. LED `n` channel `c`
    /// maps to COM `n / 9`, row `3 * (n % 9) + (2 - c)`.
    pub fn linear(led_count: usize) -> Self {
        let led_count = led_count.min(MAX_LEDS);
        let mut rows = [[None; ROWS_PER_COM]; MAX_COMS];
        let mut coms = 0usize;

        for led in 0..led_count {
            let com = led / 9;
            let base = 3 * (led % 9);
            for channel in 0..3usize {
                rows[com][base + (2 - channel)] = Some((led as u8, channel as u8));
            }
            coms = com + 1;
        }

        Self {
            led_count,
            coms: coms.max(1),
            rows,
        }
    }

    /// Number of composite LEDs this map addresses.
    pub fn led_count(&self) -> usize {
        self.led_count
    }

    /// Number of COM pins in use.
    pub fn coms(&self) -> usize {
        self.coms
    }

    /// Physical `(com, row)` for a logical `(led, channel)`, if mapped.
    pub fn position_of(&self, led: u8, channel: u8) -> Option<(u8, u8)> {
        for com in 0..self.coms {
            for row in 0..ROWS_PER_COM {
                if self.rows[com][row] == Some((led, channel)) {
                    return Some((com as u8, row as u8));
                }
            }
        }
        None
    }

    fn row_entry(&self, com: usize, row: usize) -> RowEntry {
        self.rows[com][row]
    }

    /// ROW pin enable mask: bit `r % 8` of byte `r / 8` set when row
    /// `r` is populated on any COM.
    fn row_mask(&self) -> [u8; 4] {
        let mut mask = [0u8; 4];
        for com in 0..self.coms {
            for row in 0..ROWS_PER_COM {
                if self.rows[com][row].is_some() {
                    mask[row / 8] |= 1 << (row % 8);
                }
            }
        }
        mask
    }

    /// COM pin enable mask: one bit per COM in use.
    fn com_mask(&self) -> u8 {
        (1u16 << self.coms).wrapping_sub(1) as u8
    }
}

/// HT16D35A driver: framebuffer, address map, and bus framing.
///
/// Single-owner, main-loop-context only; no locking. "Set colors" and
/// "send" are deliberately separate operations so callers can batch
/// partial updates into one transmission and avoid partial-frame
/// flicker.
pub struct Ht16d35a<SPI> {
    spi: SPI,
    map: AddressMap,
    framebuffer: Vec<Rgb8, MAX_LEDS>,
    brightness: u8,
}

impl<SPI> Ht16d35a<SPI>
where
    SPI: SpiDevice,
{
    /// Create a driver with an all-off framebuffer. Nothing is
    /// transmitted until [`init`](Self::init).
    pub fn new(spi: SPI, map: AddressMap) -> Self {
        let mut framebuffer = Vec::new();
        for _ in 0..map.led_count() {
            // Capacity is MAX_LEDS and led_count is clamped to it.
            let _ = framebuffer.push(Rgb8::OFF);
        }
        Self {
            spi,
            map,
            framebuffer,
            brightness: BRIGHTNESS_DEFAULT,
        }
    }

    /// Initialize the controller.
    ///
    /// On power-on reset the oscillator is off, COM and ROW pins are
    /// high impedance, and the display is off; display memory is NOT
    /// cleared. This sequence resets the chip, selects grayscale mode,
    /// configures the in-use COM/ROW ranges and current ratio, pushes
    /// the all-off framebuffer, and only then turns the display on.
    ///
    /// A bus error here is fatal to the badge: the caller panics and
    /// the watchdog restarts the device. There is no recovery path at
    /// this layer.
    pub fn init(&mut self) -> Result<(), SPI::Error> {
        self.command(cmd::SW_RESET)?;
        self.command_data(cmd::GLOBAL_BRIGHTNESS, self.brightness)?;
        self.command_data(cmd::GRAY_MODE, cmd::GRAY_MODE_GRAYSCALE)?;
        self.command_data(cmd::COM_PIN_CTL, self.map.com_mask())?;
        self.command_data(cmd::CURRENT_RATIO, CURRENT_RATIO_DEFAULT)?;
        // COM count; high-scan (common-anode columns) is the power-on
        // default and stays as-is.
        self.command_data(cmd::COM_NUM, (self.map.coms() - 1) as u8)?;

        let mask = self.map.row_mask();
        self.spi.write(&[
            cmd::ROW_PIN_CTL,
            mask[0],
            mask[1],
            mask[2],
            mask[3],
        ])?;

        self.command_data(cmd::SYS_OSC_CTL, cmd::SYS_OSC_ON)?;
        // Defined off state before anything becomes visible.
        self.send_framebuffer()?;
        self.command_data(cmd::SYS_OSC_CTL, cmd::SYS_OSC_DISPLAY_ON)
    }

    /// Write colors into the framebuffer without transmitting.
    ///
    /// Out-of-range writes (`start + colors.len() > led_count`) are a
    /// silent no-op: nothing is stored and nothing is sent. There is
    /// no caller on a badge that could act on an error.
    pub fn put_colors(&mut self, start: usize, colors: &[Rgb8]) {
        let Some(end) = start.checked_add(colors.len()) else {
            return;
        };
        if end > self.framebuffer.len() {
            return;
        }
        self.framebuffer[start..end].copy_from_slice(colors);
    }

    /// [`put_colors`](Self::put_colors) followed immediately by one
    /// transmission. Callers batching several partial updates should
    /// call `put_colors` repeatedly and send once instead, to avoid
    /// visible tearing from back-to-back transmissions.
    pub fn set_colors(&mut self, start: usize, colors: &[Rgb8]) -> Result<(), SPI::Error> {
        self.put_colors(start, colors);
        self.send_framebuffer()
    }

    /// Transmit the framebuffer: per COM, one framed write of the
    /// command byte, the COM address, and one 6-bit value per row.
    ///
    /// A frame is never resumed mid-transmission; on a bus error the
    /// whole frame must be retransmitted (or the watchdog resets us).
    pub fn send_framebuffer(&mut self) -> Result<(), SPI::Error> {
        for com in 0..self.map.coms() {
            let mut frame = [0u8; 2 + ROWS_PER_COM];
            frame[0] = cmd::WRITE_DISPLAY;
            frame[1] = 0x20 * com as u8;

            for row in 0..ROWS_PER_COM {
                if let Some((led, channel)) = self.map.row_entry(com, row) {
                    if let Some(color) = self.framebuffer.get(led as usize) {
                        // 8-bit model, 6-bit wire.
                        frame[2 + row] = color.channel(channel) >> 2;
                    }
                }
            }

            self.spi.write(&frame)?;
        }
        Ok(())
    }

    /// Fill the framebuffer with one color and transmit.
    pub fn all_one_color(&mut self, color: Rgb8) -> Result<(), SPI::Error> {
        for slot in self.framebuffer.iter_mut() {
            *slot = color;
        }
        self.send_framebuffer()
    }

    /// Turn every LED off and transmit.
    pub fn all_off(&mut self) -> Result<(), SPI::Error> {
        self.all_one_color(Rgb8::OFF)
    }

    /// Set the global brightness. Out-of-range values are clamped to
    /// `[BRIGHTNESS_MIN, BRIGHTNESS_MAX]`, never rejected.
    pub fn set_global_brightness(&mut self, brightness: u8) -> Result<(), SPI::Error> {
        let brightness = brightness.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
        self.brightness = brightness;
        self.command_data(cmd::GLOBAL_BRIGHTNESS, brightness)
    }

    /// Current (clamped) global brightness.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Number of addressable composite LEDs.
    pub fn led_count(&self) -> usize {
        self.framebuffer.len()
    }

    /// Oscillator and display off. Lowest power state.
    pub fn standby(&mut self) -> Result<(), SPI::Error> {
        self.command_data(cmd::SYS_OSC_CTL, cmd::SYS_OSC_STANDBY)
    }

    /// Oscillator on, display off.
    pub fn display_off(&mut self) -> Result<(), SPI::Error> {
        self.command_data(cmd::SYS_OSC_CTL, cmd::SYS_OSC_ON)
    }

    /// Oscillator and display on.
    pub fn display_on(&mut self) -> Result<(), SPI::Error> {
        self.command_data(cmd::SYS_OSC_CTL, cmd::SYS_OSC_DISPLAY_ON)
    }

    fn command(&mut self, command: u8) -> Result<(), SPI::Error> {
        self.spi.write(&[command])
    }

    fn command_data(&mut self, command: u8, data: u8) -> Result<(), SPI::Error> {
        self.spi.write(&[command, data])
    }
}
