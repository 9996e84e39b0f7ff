pub mod map_canvas;
