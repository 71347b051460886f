fn main() {
    gochi_tutorials::main_with(gochi_tutorials::triangles_scene());
}
