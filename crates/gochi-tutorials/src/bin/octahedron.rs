fn main() {
    gochi_tutorials::main_with(gochi_tutorials::octahedron_scene());
}
