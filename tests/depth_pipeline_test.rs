use simlink::config::ClientConfig;
use simlink::error::SimError;
use simlink::remote::MockRemote;
use simlink::SimClient;

/// Bottom-up sensor rows for an upright image given top-down
fn bottom_up(rows: &[&[f32]]) -> Vec<f32> {
    rows.iter().rev().flat_map(|r| r.iter().copied()).collect()
}

#[test]
fn test_depth_buffer_is_flipped_upright() {
    let remote = MockRemote::new();
    remote.add_depth_sensor("Cam", [3, 2], vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    let client = SimClient::connect(remote, &ClientConfig::default()).unwrap();

    let frame = client.get_object("Cam").unwrap().get_depth_buffer().unwrap();

    assert_eq!(frame.resolution, (3, 2));
    assert_eq!(frame.image.dimensions(), (3, 2));
    assert_eq!(frame.image.get_pixel(0, 0)[0], 0.4);
    assert_eq!(frame.image.get_pixel(2, 1)[0], 0.3);
}

#[test]
fn test_depth_buffer_resized_when_configured() {
    let remote = MockRemote::new();
    remote.add_depth_sensor("Cam", [4, 2], vec![0.75; 8]);
    let config = ClientConfig {
        depth_resize: Some([16, 16]),
        ..Default::default()
    };
    let client = SimClient::connect(remote, &config).unwrap();

    let frame = client.get_object("Cam").unwrap().get_depth_buffer().unwrap();

    assert_eq!(frame.resolution, (4, 2));
    assert_eq!(frame.image.dimensions(), (16, 16));
    assert!(frame.image.pixels().all(|p| (p[0] - 0.75).abs() < 1e-4));
}

#[test]
fn test_dilated_depth_end_to_end() {
    let far = 1.0;
    let upright: [&[f32]; 4] = [
        &[far, far, far, far],
        &[far, 0.05, far, far],
        &[far, far, far, far],
        &[far, far, far, far],
    ];
    let remote = MockRemote::new();
    remote.add_depth_sensor("Cam", [4, 4], bottom_up(&upright));
    let client = SimClient::connect(remote, &ClientConfig::default()).unwrap();

    let filled = client
        .get_object("Cam")
        .unwrap()
        .get_dilated_depth(5.0, |_| 1)
        .unwrap();

    for (x, y, p) in filled.enumerate_pixels() {
        let expected = if x <= 2 && y <= 2 { 0.05 } else { 1.0 };
        assert_eq!(p[0], expected, "pixel ({}, {})", x, y);
    }
}

#[test]
fn test_dilated_depth_near_object_beats_background() {
    let bg = 0.95;
    let upright: [&[f32]; 5] = [
        &[bg, bg, bg, bg, bg],
        &[bg, bg, bg, bg, bg],
        &[bg, bg, 0.05, bg, bg],
        &[bg, bg, bg, bg, bg],
        &[bg, bg, bg, bg, bg],
    ];
    let remote = MockRemote::new();
    remote.add_depth_sensor("Cam", [5, 5], bottom_up(&upright));
    let client = SimClient::connect(remote, &ClientConfig::default()).unwrap();

    let model = ClientConfig::default().dilation.radius_model();
    let filled = client
        .get_object("Cam")
        .unwrap()
        // near band edge is 0 m: radius clamps to max_px, far band gets round(4/4.5) = 1
        .get_dilated_depth(5.0, |d| model.radius(d))
        .unwrap();

    assert!(filled.pixels().all(|p| p[0] == 0.05));
}

#[test]
fn test_dilated_depth_rejects_bad_max_depth() {
    let remote = MockRemote::new();
    remote.add_depth_sensor("Cam", [1, 1], vec![0.5]);
    let client = SimClient::connect(remote, &ClientConfig::default()).unwrap();
    let cam = client.get_object("Cam").unwrap();

    assert!(matches!(
        cam.get_dilated_depth(0.0, |_| 1),
        Err(SimError::InvalidArgument(_))
    ));
    assert!(matches!(
        cam.get_dilated_depth(f32::NAN, |_| 1),
        Err(SimError::InvalidArgument(_))
    ));
}
