//! Menu button layout and hit testing
//!
//! Layouts are computed from the viewport so drawing and click handling use
//! the same rectangles.

use glam::Vec2;

use crate::Viewport;
use crate::shop::CATALOG;

const BUTTON_WIDTH: f32 = 200.0;
const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_SPACING: f32 = 60.0;
const SHOP_ROW_WIDTH: f32 = 420.0;
const SHOP_ROW_HEIGHT: f32 = 60.0;

/// Axis-aligned screen rectangle, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Left and top edges inclusive, right and bottom exclusive
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    Shop,
    Quit,
    Restart,
    MainMenu,
    Back,
    /// Catalog row by index
    ShopItem(usize),
}

impl Button {
    pub fn label(&self) -> &'static str {
        match self {
            Button::Start => "Start",
            Button::Shop => "Shop",
            Button::Quit => "Quit",
            Button::Restart => "Restart",
            Button::MainMenu => "Main Menu",
            Button::Back => "Back",
            Button::ShopItem(i) => CATALOG.get(*i).map(|item| item.name).unwrap_or("?"),
        }
    }
}

fn column(viewport: Viewport, top: f32, buttons: &[Button]) -> Vec<(Button, Rect)> {
    let x = viewport.width / 2.0 - BUTTON_WIDTH / 2.0;
    buttons
        .iter()
        .enumerate()
        .map(|(i, &b)| {
            let y = top + i as f32 * BUTTON_SPACING;
            (b, Rect::new(x, y, BUTTON_WIDTH, BUTTON_HEIGHT))
        })
        .collect()
}

pub fn main_menu_buttons(viewport: Viewport) -> Vec<(Button, Rect)> {
    column(viewport, 300.0, &[Button::Start, Button::Quit, Button::Shop])
}

pub fn game_over_buttons(viewport: Viewport) -> Vec<(Button, Rect)> {
    column(viewport, 400.0, &[Button::Restart, Button::MainMenu, Button::Shop])
}

pub fn shop_buttons(viewport: Viewport) -> Vec<(Button, Rect)> {
    let x = viewport.width / 2.0 - SHOP_ROW_WIDTH / 2.0;
    let mut buttons: Vec<(Button, Rect)> = (0..CATALOG.len())
        .map(|i| {
            let y = 180.0 + i as f32 * (SHOP_ROW_HEIGHT + 10.0);
            (Button::ShopItem(i), Rect::new(x, y, SHOP_ROW_WIDTH, SHOP_ROW_HEIGHT))
        })
        .collect();
    buttons.push((
        Button::Back,
        Rect::new(
            viewport.width / 2.0 - BUTTON_WIDTH / 2.0,
            viewport.height - 100.0,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        ),
    ));
    buttons
}

/// First button under `point`
pub fn hit_test(buttons: &[(Button, Rect)], point: Vec2) -> Option<Button> {
    buttons
        .iter()
        .find(|(_, rect)| rect.contains(point))
        .map(|&(button, _)| button)
}

/// Rectangle of `button` in a layout
pub fn button_rect(buttons: &[(Button, Rect)], button: Button) -> Option<Rect> {
    buttons
        .iter()
        .find(|(b, _)| *b == button)
        .map(|&(_, rect)| rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(29.9, 14.9)));
        assert!(!r.contains(Vec2::new(30.0, 12.0)));
        assert!(!r.contains(Vec2::new(15.0, 15.0)));
    }

    #[test]
    fn test_main_menu_layout() {
        let vp = Viewport::default();
        let buttons = main_menu_buttons(vp);
        // Start button matches the classic layout: centered, y = 300
        let start = button_rect(&buttons, Button::Start).unwrap();
        assert_eq!(start, Rect::new(540.0, 300.0, 200.0, 50.0));

        assert_eq!(hit_test(&buttons, Vec2::new(640.0, 325.0)), Some(Button::Start));
        assert_eq!(hit_test(&buttons, Vec2::new(640.0, 385.0)), Some(Button::Quit));
        assert_eq!(hit_test(&buttons, Vec2::new(640.0, 355.0)), None);
        assert_eq!(hit_test(&buttons, Vec2::new(10.0, 325.0)), None);
    }

    #[test]
    fn test_layouts_do_not_overlap() {
        let vp = Viewport::default();
        for layout in [main_menu_buttons(vp), game_over_buttons(vp), shop_buttons(vp)] {
            for (b, rect) in &layout {
                assert_eq!(hit_test(&layout, rect.center()), Some(*b));
            }
        }
    }

    #[test]
    fn test_shop_rows_follow_catalog() {
        let buttons = shop_buttons(Viewport::default());
        assert_eq!(buttons.len(), CATALOG.len() + 1);
        assert_eq!(Button::ShopItem(0).label(), CATALOG[0].name);
    }
}
