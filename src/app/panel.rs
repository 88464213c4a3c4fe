//! Overlay panels: scene settings and a read-only camera readout.

use glam::Vec3;

use crate::state::ProgramState;

/// Builds every overlay window for this frame.
pub fn draw_panels(ctx: &egui::Context, program: &mut ProgramState) {
    settings_window(ctx, program);
    camera_window(ctx, program);
}

fn vec3_drag(ui: &mut egui::Ui, label: &str, value: &mut Vec3, speed: f64) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(&mut value.x).speed(speed));
        ui.add(egui::DragValue::new(&mut value.y).speed(speed));
        ui.add(egui::DragValue::new(&mut value.z).speed(speed));
    });
}

/// Edits a grey level stored in all three channels.
fn scalar_slider(ui: &mut egui::Ui, label: &str, value: &mut Vec3) {
    let mut level = value.x;
    if ui.add(egui::Slider::new(&mut level, 0.0..=1.0).text(label)).changed() {
        *value = Vec3::splat(level);
    }
}

fn settings_window(ctx: &egui::Context, program: &mut ProgramState) {
    egui::Window::new("Settings")
        .default_pos([10.0, 10.0])
        .default_width(300.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Background");
                let mut color = program.clear_color.to_array();
                if ui.color_edit_button_rgb(&mut color).changed() {
                    program.clear_color = Vec3::from_array(color);
                }
            });

            ui.separator();
            vec3_drag(ui, "Statue position", &mut program.statue.position, 0.05);
            ui.add(egui::Slider::new(&mut program.statue.scale, 0.1..=4.0).text("Statue scale"));

            vec3_drag(ui, "Pedestal position", &mut program.pedestal.position, 0.05);
            ui.add(egui::Slider::new(&mut program.pedestal.scale, 0.006..=4.0).text("Pedestal scale"));

            ui.separator();
            for (index, light) in program.lighting.points.iter_mut().enumerate() {
                egui::CollapsingHeader::new(format!("Point light {index}")).show(ui, |ui| {
                    let attenuation = &mut light.attenuation;
                    ui.add(egui::Slider::new(&mut attenuation.constant, 0.0..=1.0).text("constant"));
                    ui.add(egui::Slider::new(&mut attenuation.linear, 0.0..=1.0).text("linear"));
                    ui.add(egui::Slider::new(&mut attenuation.quadratic, 0.0..=1.0).text("quadratic"));
                });
            }

            ui.collapsing("Directional light", |ui| {
                let dir = &mut program.lighting.dir;
                vec3_drag(ui, "Direction", &mut dir.direction, 0.05);
                scalar_slider(ui, "ambient", &mut dir.ambient);
                scalar_slider(ui, "diffuse", &mut dir.diffuse);
                scalar_slider(ui, "specular", &mut dir.specular);
            });
        });
}

fn camera_window(ctx: &egui::Context, program: &mut ProgramState) {
    egui::Window::new("Camera info")
        .default_pos([10.0, 420.0])
        .show(ctx, |ui| {
            let camera = &program.camera;
            egui::Grid::new("camera_grid")
                .num_columns(2)
                .spacing([20.0, 4.0])
                .show(ui, |ui| {
                    ui.label("Position:");
                    ui.label(format!("{:.3}, {:.3}, {:.3}", camera.position.x, camera.position.y, camera.position.z));
                    ui.end_row();

                    ui.label("(Yaw, Pitch):");
                    ui.label(format!("{:.1}°, {:.1}°", camera.yaw, camera.pitch));
                    ui.end_row();

                    ui.label("Front:");
                    ui.label(format!("{:.3}, {:.3}, {:.3}", camera.front.x, camera.front.y, camera.front.z));
                    ui.end_row();
                });

            ui.checkbox(&mut program.camera_mouse_update, "Camera mouse update");
        });
}
