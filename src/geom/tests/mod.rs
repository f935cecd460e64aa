mod test_edge_length;
mod test_surface_area;
