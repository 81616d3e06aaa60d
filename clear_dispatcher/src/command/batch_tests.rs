//! Unit tests for batch.rs

use crate::command::mock_backend::{MockCommandList, RecordedCommand};
use crate::command::transition_render_pass_attachments;
use crate::error::Error;
use crate::resource::{
    AspectFlags, AttachmentView, Format, FramebufferState, ImageHandle, ImageInfo, ImageLayout,
    ImageRegistry, ImageResource,
};

fn framebuffer(images: &mut ImageRegistry) -> FramebufferState {
    let color = images.insert(ImageResource::new(
        ImageHandle(1),
        ImageInfo::new_2d(Format::B8G8R8A8_SRGB, 64, 64),
    ));
    let depth = images.insert(ImageResource::new(
        ImageHandle(2),
        ImageInfo::new_2d(Format::D24_UNORM_S8_UINT, 64, 64),
    ));

    let mut fb = FramebufferState::new(64, 64);
    fb.set_color_attachment(0, Some(AttachmentView::new(color, Format::B8G8R8A8_SRGB))).unwrap();
    // Same image bound twice
    fb.set_color_attachment(2, Some(AttachmentView::new(color, Format::B8G8R8A8_SRGB))).unwrap();
    fb.set_depth_stencil_attachment(Some(AttachmentView::new(depth, Format::D24_UNORM_S8_UINT)));
    fb
}

// ============================================================================
// ATTACHMENT TRANSITIONS
// ============================================================================

#[test]
fn test_attachments_move_to_attachment_layouts() {
    let mut images = ImageRegistry::new();
    let fb = framebuffer(&mut images);
    images
        .get_mut(fb.color_attachment(0).unwrap().image())
        .unwrap()
        .assume_layout(ImageLayout::TransferDst);
    let mut cmd = MockCommandList::new();

    let transitions = transition_render_pass_attachments(&mut cmd, &fb, &mut images).unwrap();

    assert_eq!(transitions, 2);
    assert_eq!(cmd.commands.len(), 2);
    match (&cmd.commands[0], &cmd.commands[1]) {
        (RecordedCommand::Barrier(color), RecordedCommand::Barrier(depth)) => {
            assert_eq!(color.image, ImageHandle(1));
            assert_eq!(color.old_layout, ImageLayout::TransferDst);
            assert_eq!(color.new_layout, ImageLayout::ColorAttachment);
            assert_eq!(color.range.aspect, AspectFlags::COLOR);

            assert_eq!(depth.image, ImageHandle(2));
            assert_eq!(depth.new_layout, ImageLayout::DepthStencilAttachment);
            assert_eq!(depth.range.aspect, AspectFlags::DEPTH | AspectFlags::STENCIL);
        }
        other => panic!("expected two barriers, got {:?}", other),
    }

    let depth_key = fb.depth_stencil_attachment().unwrap().image();
    assert_eq!(images.get(depth_key).unwrap().layout(), ImageLayout::DepthStencilAttachment);
}

#[test]
fn test_attachments_already_in_place_record_nothing() {
    let mut images = ImageRegistry::new();
    let fb = framebuffer(&mut images);
    let mut cmd = MockCommandList::new();

    transition_render_pass_attachments(&mut cmd, &fb, &mut images).unwrap();
    cmd.commands.clear();

    assert_eq!(transition_render_pass_attachments(&mut cmd, &fb, &mut images).unwrap(), 0);
    assert!(cmd.commands.is_empty());
}

#[test]
fn test_missing_attachment_image_is_skipped() {
    let mut images = ImageRegistry::new();
    let fb = framebuffer(&mut images);
    images.remove(fb.color_attachment(0).unwrap().image());
    let mut cmd = MockCommandList::new();

    assert_eq!(transition_render_pass_attachments(&mut cmd, &fb, &mut images).unwrap(), 1);
}

#[test]
fn test_transition_error_propagates() {
    let mut images = ImageRegistry::new();
    let fb = framebuffer(&mut images);
    let mut cmd = MockCommandList::new();
    cmd.fail_with = Some(Error::BackendError("device lost".to_string()));

    let result = transition_render_pass_attachments(&mut cmd, &fb, &mut images);

    assert!(matches!(result, Err(Error::BackendError(_))));
}
