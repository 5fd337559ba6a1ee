/*!
Work RAM behind CPU addresses `$0000-$1FFF`.

The console only decodes the low eleven address lines for this window, so
the 2 KiB array shows up four times. Every access here takes a raw CPU
address and folds it into the array; callers never pre-mask.

Page `$01` of this array is the hardware stack and page `$00` is where
zero-page addressing lands.
*/

/// Bytes of work RAM on the board.
pub const CPU_RAM_SIZE: usize = 0x0800;

/// Work RAM, zero-filled at power on.
#[derive(Clone)]
pub struct Ram {
    data: [u8; CPU_RAM_SIZE],
}

impl Default for Ram {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0; CPU_RAM_SIZE],
        }
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.data[Self::mirror_index(addr)]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.data[Self::mirror_index(addr)] = value;
    }

    /// The backing bytes, for dumps that must not touch the bus.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Array slot that a CPU address in `$0000-$1FFF` lands on.
    #[inline]
    pub fn mirror_index(addr: u16) -> usize {
        usize::from(addr) % CPU_RAM_SIZE
    }
}
