pub mod tile_algorithm;
