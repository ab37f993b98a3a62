use glam::Vec2;

/// Fixed-size little-endian byte representation.
pub trait AsBytes<const N: usize>: Sized {
    fn from_bytes(b: [u8; N]) -> Self;

    fn to_bytes(self) -> [u8; N];
}

macro_rules! impl_as_bytes {
    ($($t:ty => $n:literal),* $(,)?) => {
        $(
            impl AsBytes<$n> for $t {
                fn from_bytes(b: [u8; $n]) -> Self {
                    <$t>::from_le_bytes(b)
                }

                fn to_bytes(self) -> [u8; $n] {
                    self.to_le_bytes()
                }
            }
        )*
    };
}

impl_as_bytes!(u8 => 1, u32 => 4, u64 => 8, f32 => 4);

impl AsBytes<8> for Vec2 {
    fn from_bytes(b: [u8; 8]) -> Self {
        let [x0, x1, x2, x3, y0, y1, y2, y3] = b;
        Vec2::new(
            f32::from_bytes([x0, x1, x2, x3]),
            f32::from_bytes([y0, y1, y2, y3]),
        )
    }

    fn to_bytes(self) -> [u8; 8] {
        let [x0, x1, x2, x3] = self.x.to_bytes();
        let [y0, y1, y2, y3] = self.y.to_bytes();
        [x0, x1, x2, x3, y0, y1, y2, y3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_components_are_laid_out_in_order() {
        let bytes = Vec2::new(1.0, -2.5).to_bytes();
        assert_eq!(bytes[..4], 1.0f32.to_le_bytes());
        assert_eq!(bytes[4..], (-2.5f32).to_le_bytes());
        assert_eq!(Vec2::from_bytes(bytes), Vec2::new(1.0, -2.5));
    }
}
