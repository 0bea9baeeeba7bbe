use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_bright: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb { r: 198, g: 120, b: 221 },
            info: Color::Rgb { r: 97, g: 175, b: 239 },
            success: Color::Rgb { r: 152, g: 195, b: 121 },
            warning: Color::Rgb { r: 229, g: 192, b: 123 },
            error: Color::Rgb { r: 224, g: 108, b: 117 },
            text: Color::Rgb { r: 171, g: 178, b: 191 },
            text_muted: Color::Rgb { r: 92, g: 99, b: 112 },
            text_bright: Color::White,
        }
    }
}
