//! Centralized constants for canvas geometry, spacing, and colors.
//!
//! Keeping the numbers here means the model, the canvas renderer, and the tests all agree
//! on the same node sizes and margins.

use egui::Color32;

// =============================================================================
// ARRANGEMENT GEOMETRY
// =============================================================================

/// Width of a mod node on the canvas.
pub const MOD_NODE_WIDTH: f32 = 120.0;

/// Height of a mod node on the canvas.
pub const MOD_NODE_HEIGHT: f32 = 40.0;

/// Width given to a freshly created category and to categories loaded without a size.
pub const DEFAULT_CATEGORY_WIDTH: f32 = 200.0;

/// Height given to a freshly created category and to categories loaded without a size.
pub const DEFAULT_CATEGORY_HEIGHT: f32 = 150.0;

/// Space kept between a category's trailing edges and the furthest mod inside it.
pub const FIT_MARGIN: f32 = 20.0;

/// Hex color used for categories that were created or loaded without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3c3c3c";

/// Version recorded for a mod whose payload lists no versions.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Base of the canonical web link synthesized from a mod slug.
pub const MOD_URL_BASE: &str = "https://modrinth.com/mod/";

// =============================================================================
// CANVAS CONSTANTS
// =============================================================================

/// Extra room kept below and to the right of the furthest node so it can be dragged further.
pub const CANVAS_PADDING: f32 = 64.0;

/// Side length of the square grip drawn in a category's bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f32 = 12.0;

/// Offset of node labels from the node's top-left corner.
pub const LABEL_INSET: f32 = 5.0;

/// Alpha applied to category fills so overlapping regions stay readable.
pub const CATEGORY_FILL_ALPHA: u8 = 100;

/// Corner radius for category rectangles.
pub const CATEGORY_CORNER_RADIUS: f32 = 4.0;

/// Corner radius for mod nodes.
pub const MOD_CORNER_RADIUS: f32 = 3.0;

// =============================================================================
// WINDOW CONSTANTS
// =============================================================================

/// Initial window width when the application starts.
pub const INITIAL_WINDOW_WIDTH: f32 = 1200.0;

/// Initial window height when the application starts.
pub const INITIAL_WINDOW_HEIGHT: f32 = 800.0;

/// Default width of the search side panel.
pub const SEARCH_PANEL_WIDTH: f32 = 320.0;

/// Edge length of result-card icons.
pub const RESULT_ICON_SIZE: f32 = 40.0;

// =============================================================================
// TOOLBAR CONSTANTS
// =============================================================================

/// Spacing at the start of the toolbar.
pub const TOOLBAR_START_SPACING: f32 = 8.0;

/// Size of toolbar button icons.
pub const TOOLBAR_ICON_SIZE: f32 = 20.0;

/// Minimum size for toolbar buttons.
pub const TOOLBAR_BUTTON_SIZE: f32 = 32.0;

// =============================================================================
// COLORS
// =============================================================================

/// Canvas background.
pub const COLOR_CANVAS_BG: Color32 = Color32::from_rgb(30, 30, 30);

/// Background color for the toolbar.
pub const COLOR_TOOLBAR_BG: Color32 = Color32::from_rgb(30, 30, 30);

/// Mod node fill.
pub const COLOR_MOD_FILL: Color32 = Color32::from_rgb(70, 70, 78);

/// Mod node outline.
pub const COLOR_MOD_STROKE: Color32 = Color32::from_rgb(140, 140, 150);

/// Outline of the category currently under a dragged search result.
pub const COLOR_DROP_TARGET: Color32 = Color32::from_rgb(120, 170, 255);

/// Color of status-line error messages.
pub const COLOR_ERROR_TEXT: Color32 = Color32::from_rgb(255, 110, 110);
